use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Output format of the crate's own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// JSON unless `RUST_LOG_FORMAT` is set to something other than `json`.
    pub fn from_env() -> Self {
        let use_json = std::env::var("RUST_LOG_FORMAT")
            .map(|v| v == "json")
            .unwrap_or(true); // Default to JSON for production

        if use_json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Initialize the tracing subscriber using the format from the environment.
pub fn init_tracing() -> Result<(), TryInitError> {
    init_tracing_with(LogFormat::from_env())
}

/// Installs a global subscriber filtered by `RUST_LOG`, or `info` when unset.
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_tracing_with(format: LogFormat) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init(),
    }
}
