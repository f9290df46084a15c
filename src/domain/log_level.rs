use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity of a log message, and the threshold the dispatcher filters on.
///
/// Ordering follows the discriminants, so `Debug < Info < ... < None`.
/// Serializes as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
    None = 5,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("Log level must be numeric, got {0}")]
    NotNumeric(String),
    #[error("Log level {0} is not a recognized level (0-5)")]
    OutOfRange(String),
    #[error("Unknown log level name: {0}")]
    UnknownName(String),
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::None,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::None => "none",
        }
    }

    pub fn from_i64(value: i64) -> Result<Self, LevelError> {
        match value {
            0 => Ok(LogLevel::Debug),
            1 => Ok(LogLevel::Info),
            2 => Ok(LogLevel::Warning),
            3 => Ok(LogLevel::Error),
            4 => Ok(LogLevel::Fatal),
            5 => Ok(LogLevel::None),
            other => Err(LevelError::OutOfRange(other.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<i64> for LogLevel {
    type Error = LevelError;

    fn try_from(value: i64) -> Result<Self, LevelError> {
        LogLevel::from_i64(value)
    }
}

/// Validation for levels arriving from untyped sources (JSON, config, FFI).
impl TryFrom<&Value> for LogLevel {
    type Error = LevelError;

    fn try_from(value: &Value) -> Result<Self, LevelError> {
        match value {
            Value::Number(number) => match number.as_i64() {
                Some(n) => LogLevel::from_i64(n),
                None => Err(LevelError::OutOfRange(number.to_string())),
            },
            other => Err(LevelError::NotNumeric(other.to_string())),
        }
    }
}

impl FromStr for LogLevel {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return LogLevel::from_i64(n);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            "none" | "off" => Ok(LogLevel::None),
            _ => Err(LevelError::UnknownName(trimmed.to_string())),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => LogLevel::from_i64(n),
            Repr::Name(name) => name.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}
