#![warn(rust_2018_idioms)]
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc, // Error enums document themselves
    clippy::module_name_repetitions,
    clippy::must_use_candidate
)]

//! Pluggable logging dispatcher.
//!
//! A [`Dispatcher`] accepts leveled log calls, merges per-call [`Metadata`]
//! over its defaults, filters by a minimum [`LogLevel`] and fans the call out
//! to every attached [`Destination`] concurrently.

pub mod config;
pub mod destination;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod observability;

pub use config::{DestinationConfig, DispatcherConfig};
pub use destination::{
    Completion, ConsoleDestination, ConsoleOptions, Destination, FileDestination, FileOptions,
    HttpJsonDestination, HttpJsonOptions,
};
pub use dispatcher::Dispatcher;
pub use domain::{LevelError, LogLevel, Metadata};
pub use error::{ConfigError, DestinationError, DestinationFailure, DispatchError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
