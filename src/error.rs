use crate::domain::LevelError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Setup-time failures: bad options, bad destinations, bad levels.
///
/// Returned synchronously from constructors, `attach_destination`,
/// `set_log_level_value` and config loading. These are programming or
/// deployment mistakes and are never routed through a log completion.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is a required option")]
    MissingOption(&'static str),

    #[error("Invalid option {option}: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("Destination {0} cannot accept log calls")]
    InvalidDestination(String),

    #[error("Invalid log level: {0}")]
    InvalidLevel(#[from] LevelError),

    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment error: {0}")]
    Env(String),
}

/// Failure of a single destination's write attempt.
#[derive(Error, Debug)]
pub enum DestinationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Destination did not complete within {0:?}")]
    Timeout(Duration),
}

/// A destination error tagged with the destination that produced it.
#[derive(Error, Debug)]
#[error("{destination}: {source}")]
pub struct DestinationFailure {
    pub destination: String,
    #[source]
    pub source: DestinationError,
}

/// Failure channel of a `Dispatcher::log` completion.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    InvalidLevel(#[from] LevelError),

    #[error("Message is required")]
    MissingMessage,

    #[error("{} of {attempted} destination(s) failed; first: {}", .failures.len(), first_failure(.failures))]
    Destinations {
        attempted: usize,
        failures: Vec<DestinationFailure>,
    },
}

impl DispatchError {
    /// Every destination failure carried by this error, in attach order.
    pub fn failures(&self) -> &[DestinationFailure] {
        match self {
            DispatchError::Destinations { failures, .. } => failures,
            _ => &[],
        }
    }
}

fn first_failure(failures: &[DestinationFailure]) -> String {
    failures
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}
