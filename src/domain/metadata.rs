use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which a process identifier is recognized.
pub const PROCESS_ID: &str = "processID";
/// Key under which the event time is recognized.
pub const TIMESTAMP: &str = "timestamp";
/// Key under which a transaction identifier is recognized.
pub const TRANSACTION_ID: &str = "transactionID";

/// Open key/value context attached to a log message.
///
/// Serializes as a plain JSON object, so keys outside the recognized set
/// reach destinations that forward raw metadata untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn with_process_id(self, process_id: impl Into<String>) -> Self {
        self.with(PROCESS_ID, process_id.into())
    }

    pub fn with_transaction_id(self, transaction_id: impl Into<String>) -> Self {
        self.with(TRANSACTION_ID, transaction_id.into())
    }

    /// Stores `at` as an ISO-8601 UTC string with millisecond precision.
    pub fn with_timestamp(self, at: DateTime<Utc>) -> Self {
        self.with(TIMESTAMP, format_timestamp(at))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn process_id(&self) -> Option<String> {
        self.get(PROCESS_ID).and_then(present_text)
    }

    pub fn transaction_id(&self) -> Option<String> {
        self.get(TRANSACTION_ID).and_then(present_text)
    }

    /// Parsed timestamp: RFC 3339 strings or integer epoch milliseconds.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.get(TIMESTAMP)? {
            Value::String(raw) => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|at| at.with_timezone(&Utc)),
            Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        }
    }

    /// Timestamp text for line output. Parseable values are normalized to
    /// ISO-8601 with a `Z` suffix; other present values are rendered as-is.
    pub fn timestamp_text(&self) -> Option<String> {
        let raw = self.get(TIMESTAMP).filter(|value| is_present(value))?;
        match self.timestamp() {
            Some(at) => Some(format_timestamp(at)),
            None => present_text(raw),
        }
    }

    /// Returns a copy of `self` laid over `defaults`: keys present here win,
    /// keys only present in `defaults` fill the gaps. Neither input changes.
    pub fn merged_over(&self, defaults: &Metadata) -> Metadata {
        let mut merged = defaults.0.clone();
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        Metadata(merged)
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A value counts as present unless it is null, false, zero or empty text.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present_text(value: &Value) -> Option<String> {
    if !is_present(value) {
        return None;
    }
    match value {
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
