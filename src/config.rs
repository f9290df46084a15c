use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::destination::{
    ConsoleDestination, ConsoleOptions, Destination, FileDestination, FileOptions,
    HttpJsonDestination, HttpJsonOptions,
};
use crate::dispatcher::Dispatcher;
use crate::domain::{LogLevel, Metadata};
use crate::error::ConfigError;

/// Overrides `min_level`. Accepts a level name or its number.
pub const MIN_LEVEL_ENV: &str = "RASK_DISPATCH_MIN_LEVEL";

/// One `[[destinations]]` entry, selected by its `type` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestinationConfig {
    Console(ConsoleOptions),
    File(FileOptions),
    HttpJson(HttpJsonOptions),
}

impl DestinationConfig {
    pub fn build(&self) -> Result<Arc<dyn Destination>, ConfigError> {
        let destination: Arc<dyn Destination> = match self {
            DestinationConfig::Console(options) => Arc::new(ConsoleDestination::new(*options)),
            DestinationConfig::File(options) => Arc::new(FileDestination::new(options.clone())?),
            DestinationConfig::HttpJson(options) => {
                Arc::new(HttpJsonDestination::new(options.clone())?)
            }
        };
        Ok(destination)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            DestinationConfig::Console(_) => Ok(()),
            DestinationConfig::File(options) => {
                if options.filename.is_none() {
                    return Err(ConfigError::MissingOption("filename"));
                }
                Ok(())
            }
            DestinationConfig::HttpJson(options) => {
                if options.url.is_none() {
                    return Err(ConfigError::MissingOption("url"));
                }
                if options.method.is_none() {
                    return Err(ConfigError::MissingOption("method"));
                }
                Ok(())
            }
        }
    }
}

/// Declarative dispatcher setup, usually read from TOML:
///
/// ```toml
/// min_level = "warning"
/// destination_timeout_ms = 2000
///
/// [default_metadata]
/// processID = "billing-7"
///
/// [[destinations]]
/// type = "console"
/// log_process_id = true
///
/// [[destinations]]
/// type = "file"
/// filename = "/var/log/billing.log"
/// append = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub min_level: LogLevel,
    pub destination_timeout_ms: Option<u64>,
    pub default_metadata: Metadata,
    pub destinations: Vec<DestinationConfig>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            destination_timeout_ms: None,
            default_metadata: Metadata::new(),
            destinations: Vec::new(),
        }
    }
}

impl DispatcherConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Applies `RASK_DISPATCH_MIN_LEVEL` (or `RASK_DISPATCH_MIN_LEVEL_FILE`).
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(raw) = env_or_file(MIN_LEVEL_ENV)? {
            self.min_level = raw.parse()?;
        }
        Ok(())
    }

    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destination_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidOption {
                option: "destination_timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        self.destinations
            .iter()
            .try_for_each(DestinationConfig::validate)
    }

    /// Constructs every destination and attaches it to a new dispatcher.
    pub fn build(&self) -> Result<Dispatcher, ConfigError> {
        self.validate()?;

        let mut dispatcher = Dispatcher::new();
        dispatcher.set_log_level(self.min_level);
        dispatcher.default_metadata = self.default_metadata.clone();
        dispatcher.set_destination_timeout(self.destination_timeout_ms.map(Duration::from_millis));

        for destination in &self.destinations {
            dispatcher.attach_destination(destination.build()?)?;
        }

        info!(
            min_level = %self.min_level,
            destinations = self.destinations.len(),
            "Dispatcher configured"
        );
        Ok(dispatcher)
    }
}

/// Read a value from environment variable, with support for _FILE suffix (Docker Secrets)
fn env_or_file(env_name: &str) -> Result<Option<String>, ConfigError> {
    let file_env = format!("{env_name}_FILE");
    if let Ok(file_path) = env::var(&file_env) {
        return fs::read_to_string(&file_path)
            .map(|content| Some(content.trim().to_string()))
            .map_err(|e| ConfigError::Env(format!("Failed to read {file_env}: {e}")));
    }

    match env::var(env_name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::Env(format!("{env_name}: {e}"))),
    }
}
