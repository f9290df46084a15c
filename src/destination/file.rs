// Append formatted lines to a single file handle opened at construction.
// Each write is flushed and synced before its completion resolves, so a
// successful log call means the bytes reached the OS. No rotation and no
// reopening: the handle lives as long as the destination.

use super::format::{FILE_TRANSACTION_LABEL, LineFormat};
use super::{Completion, Destination};
use crate::domain::{LogLevel, Metadata};
use crate::error::{ConfigError, DestinationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOptions {
    /// Required. Path of the log file.
    pub filename: Option<PathBuf>,
    /// Append to an existing file (default) or truncate it.
    pub append: bool,
    #[serde(alias = "logProcessID")]
    pub log_process_id: bool,
    #[serde(alias = "logTimestamp")]
    pub log_timestamp: bool,
    #[serde(alias = "logTransactionID")]
    pub log_transaction_id: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            filename: None,
            append: true,
            log_process_id: false,
            log_timestamp: false,
            log_transaction_id: false,
        }
    }
}

impl FileOptions {
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Self::default()
        }
    }
}

pub struct FileDestination {
    name: String,
    path: PathBuf,
    options: FileOptions,
    format: LineFormat,
    file: Mutex<File>,
}

impl FileDestination {
    /// Opens the target immediately. Fails if `filename` is missing or the
    /// file cannot be opened in the requested mode.
    pub fn new(options: FileOptions) -> Result<Self, ConfigError> {
        let path = options
            .filename
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(ConfigError::MissingOption("filename"))?;

        let mut open_options = std::fs::OpenOptions::new();
        open_options.create(true);
        if options.append {
            open_options.append(true);
        } else {
            open_options.write(true).truncate(true);
        }

        let file = open_options
            .open(&path)
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), append = options.append, "Opened log file");

        Ok(Self {
            name: format!("file:{}", path.display()),
            format: LineFormat {
                log_process_id: options.log_process_id,
                log_timestamp: options.log_timestamp,
                log_transaction_id: options.log_transaction_id,
                transaction_label: FILE_TRANSACTION_LABEL,
            },
            file: Mutex::new(File::from_std(file)),
            path,
            options,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &FileOptions {
        &self.options
    }

    async fn write_line(&self, line: String) -> Result<(), DestinationError> {
        let mut file = self.file.lock().await;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        Ok(())
    }
}

impl Destination for FileDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn log<'a>(
        &'a self,
        _level: LogLevel,
        message: &'a str,
        metadata: &'a Metadata,
    ) -> Completion<'a> {
        let mut line = self.format.render(message, metadata);
        line.push('\n');
        Box::pin(self.write_line(line))
    }
}

impl std::fmt::Debug for FileDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileDestination")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
