use crate::destination::Destination;
use crate::domain::{LogLevel, Metadata};
use crate::error::{ConfigError, DestinationError, DestinationFailure, DispatchError};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Central logger: filters by level, fills metadata defaults and fans each
/// call out to every attached destination.
///
/// Configuration (`attach_destination`, `set_log_level`, `default_metadata`)
/// takes `&mut self`, logging takes `&self`. A single owner configures the
/// dispatcher between bursts of logging; share it behind `Arc` (or an
/// `RwLock` when it must be reconfigured while shared).
pub struct Dispatcher {
    min_level: LogLevel,
    /// Merged under every call's metadata. Per-call keys take precedence.
    pub default_metadata: Metadata,
    destinations: Vec<Arc<dyn Destination>>,
    destination_timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            default_metadata: Metadata::new(),
            destinations: Vec::new(),
            destination_timeout: None,
        }
    }

    /// Bounds how long each destination may take per call. A destination
    /// that overruns fails with [`DestinationError::Timeout`].
    pub fn with_destination_timeout(mut self, limit: Duration) -> Self {
        self.destination_timeout = Some(limit);
        self
    }

    pub fn log_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        debug!(from = %self.min_level, to = %level, "Log level changed");
        self.min_level = level;
    }

    /// Untyped variant of [`set_log_level`](Self::set_log_level); rejects
    /// anything that is not one of the six numeric levels.
    pub fn set_log_level_value(&mut self, level: &Value) -> Result<(), ConfigError> {
        let level = LogLevel::try_from(level)?;
        self.set_log_level(level);
        Ok(())
    }

    pub fn destination_timeout(&self) -> Option<Duration> {
        self.destination_timeout
    }

    pub fn set_destination_timeout(&mut self, limit: Option<Duration>) {
        self.destination_timeout = limit;
    }

    /// Appends `destination` after checking it can take log calls.
    pub fn attach_destination(
        &mut self,
        destination: Arc<dyn Destination>,
    ) -> Result<(), ConfigError> {
        if !destination.can_log() {
            return Err(ConfigError::InvalidDestination(
                destination.name().to_string(),
            ));
        }
        debug!(destination = destination.name(), "Attached destination");
        self.destinations.push(destination);
        Ok(())
    }

    /// Attached destinations in insertion order.
    pub fn destinations(&self) -> &[Arc<dyn Destination>] {
        &self.destinations
    }

    /// Raw access to the destination list. Entries added here skip the
    /// `attach_destination` check; ones that cannot log are ignored when
    /// dispatching.
    pub fn destinations_mut(&mut self) -> &mut Vec<Arc<dyn Destination>> {
        &mut self.destinations
    }

    /// Logs `message` to every destination if `level` meets the threshold.
    ///
    /// All destinations are started before any is awaited to completion.
    /// Resolves once every one has settled; fails if any of them failed,
    /// carrying every failure.
    pub async fn log(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
    ) -> Result<(), DispatchError> {
        let metadata = metadata.unwrap_or_default().merged_over(&self.default_metadata);

        if level < self.min_level {
            trace!(%level, threshold = %self.min_level, "Log call below threshold");
            return Ok(());
        }

        let targets: Vec<&dyn Destination> = self
            .destinations
            .iter()
            .map(|destination| &**destination)
            .filter(|destination| destination.can_log())
            .collect();

        debug!(%level, destinations = targets.len(), "Dispatching log call");

        let outcomes = join_all(
            targets
                .iter()
                .map(|destination| self.invoke(*destination, level, message, &metadata)),
        )
        .await;

        let attempted = outcomes.len();
        let failures: Vec<DestinationFailure> = targets
            .iter()
            .zip(outcomes)
            .filter_map(|(destination, outcome)| {
                outcome.err().map(|source| {
                    warn!(destination = destination.name(), error = %source, "Destination failed");
                    DestinationFailure {
                        destination: destination.name().to_string(),
                        source,
                    }
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Destinations {
                attempted,
                failures,
            })
        }
    }

    /// Entry point for callers holding untyped input (JSON, scripting
    /// bridges). Validation failures come back as errors, never panics.
    pub async fn log_untyped(
        &self,
        level: &Value,
        message: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<(), DispatchError> {
        let level = LogLevel::try_from(level)?;
        let message = message.ok_or(DispatchError::MissingMessage)?;
        self.log(level, message, metadata).await
    }

    pub async fn debug(&self, message: &str) -> Result<(), DispatchError> {
        self.log(LogLevel::Debug, message, None).await
    }

    pub async fn info(&self, message: &str) -> Result<(), DispatchError> {
        self.log(LogLevel::Info, message, None).await
    }

    pub async fn warning(&self, message: &str) -> Result<(), DispatchError> {
        self.log(LogLevel::Warning, message, None).await
    }

    pub async fn error(&self, message: &str) -> Result<(), DispatchError> {
        self.log(LogLevel::Error, message, None).await
    }

    pub async fn fatal(&self, message: &str) -> Result<(), DispatchError> {
        self.log(LogLevel::Fatal, message, None).await
    }

    async fn invoke(
        &self,
        destination: &dyn Destination,
        level: LogLevel,
        message: &str,
        metadata: &Metadata,
    ) -> Result<(), DestinationError> {
        let completion = destination.log(level, message, metadata);
        match self.destination_timeout {
            Some(limit) => tokio::time::timeout(limit, completion)
                .await
                .unwrap_or_else(|_| Err(DestinationError::Timeout(limit))),
            None => completion.await,
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.destinations.iter().map(|d| d.name()).collect();
        f.debug_struct("Dispatcher")
            .field("min_level", &self.min_level)
            .field("default_metadata", &self.default_metadata)
            .field("destinations", &names)
            .field("destination_timeout", &self.destination_timeout)
            .finish()
    }
}
