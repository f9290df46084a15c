use super::format::{CONSOLE_TRANSACTION_LABEL, LineFormat};
use super::{Completion, Destination};
use crate::domain::{LogLevel, Metadata};
use crate::error::DestinationError;
use futures::future;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Console output options. Every flag defaults to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleOptions {
    #[serde(alias = "logProcessID")]
    pub log_process_id: bool,
    #[serde(alias = "logTimestamp")]
    pub log_timestamp: bool,
    #[serde(alias = "logTransactionID")]
    pub log_transaction_id: bool,
}

type Stream = Mutex<Box<dyn Write + Send>>;

/// Writes one line per message; `Error` and above go to the error stream,
/// everything else to standard output.
///
/// The write happens when `log` is called. The returned completion is
/// already settled.
pub struct ConsoleDestination {
    options: ConsoleOptions,
    format: LineFormat,
    stdout: Stream,
    stderr: Stream,
}

impl ConsoleDestination {
    pub fn new(options: ConsoleOptions) -> Self {
        Self::with_streams(options, io::stdout(), io::stderr())
    }

    /// Routes output to arbitrary writers instead of the process streams.
    pub fn with_streams(
        options: ConsoleOptions,
        stdout: impl Write + Send + 'static,
        stderr: impl Write + Send + 'static,
    ) -> Self {
        Self {
            options,
            format: LineFormat {
                log_process_id: options.log_process_id,
                log_timestamp: options.log_timestamp,
                log_transaction_id: options.log_transaction_id,
                transaction_label: CONSOLE_TRANSACTION_LABEL,
            },
            stdout: Mutex::new(Box::new(stdout) as Box<dyn Write + Send>),
            stderr: Mutex::new(Box::new(stderr) as Box<dyn Write + Send>),
        }
    }

    pub fn options(&self) -> ConsoleOptions {
        self.options
    }

    fn write_line(&self, level: LogLevel, line: &str) -> io::Result<()> {
        let stream = if level >= LogLevel::Error {
            &self.stderr
        } else {
            &self.stdout
        };
        let mut writer = stream.lock();
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}

impl Default for ConsoleDestination {
    fn default() -> Self {
        Self::new(ConsoleOptions::default())
    }
}

impl Destination for ConsoleDestination {
    fn name(&self) -> &str {
        "console"
    }

    fn log<'a>(
        &'a self,
        level: LogLevel,
        message: &'a str,
        metadata: &'a Metadata,
    ) -> Completion<'a> {
        let line = self.format.render(message, metadata);
        let result = self
            .write_line(level, &line)
            .map_err(DestinationError::from);
        Box::pin(future::ready(result))
    }
}

impl std::fmt::Debug for ConsoleDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleDestination")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
