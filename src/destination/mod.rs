pub mod console;
pub mod file;
pub mod format;
pub mod http_json;

use crate::domain::{LogLevel, Metadata};
use crate::error::DestinationError;
use std::future::Future;
use std::pin::Pin;

pub use console::{ConsoleDestination, ConsoleOptions};
pub use file::{FileDestination, FileOptions};
pub use format::LineFormat;
pub use http_json::{HttpJsonDestination, HttpJsonOptions};

/// Eventual outcome of a single destination write.
pub type Completion<'a> = Pin<Box<dyn Future<Output = Result<(), DestinationError>> + Send + 'a>>;

/// A sink for log messages (console, file, HTTP endpoint, ...).
///
/// This trait is dyn-compatible by using boxed futures instead of `impl Future`.
///
/// Operational failures must come back through the returned [`Completion`],
/// never as a panic. Construction is the only place an implementation should
/// reject its configuration. `log` does no level filtering of its own; the
/// dispatcher applies the threshold before calling it.
pub trait Destination: Send + Sync {
    /// Identifies the destination in failures and diagnostics.
    fn name(&self) -> &str;

    /// Whether this destination is able to take log calls at all.
    ///
    /// The dispatcher refuses to attach a destination that answers `false`
    /// and silently skips one that was placed in its list by other means.
    fn can_log(&self) -> bool {
        true
    }

    fn log<'a>(&'a self, level: LogLevel, message: &'a str, metadata: &'a Metadata)
    -> Completion<'a>;
}
