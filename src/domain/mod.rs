//! Domain layer for rask-log-dispatcher.
//!
//! Contains the types every destination and the dispatcher agree on:
//! - `LogLevel`: ordered severity, used both for messages and thresholds
//! - `Metadata`: open key/value context that travels with a message

pub mod log_level;
pub mod metadata;

pub use log_level::{LevelError, LogLevel};
pub use metadata::Metadata;
