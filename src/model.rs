use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a log group in the remote store (e.g. `/aws/lambda/EskomLambda`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamGroupId(String);

impl StreamGroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single log event as returned by the remote store.
/// Either field may be missing on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

impl LogEntry {
    pub fn new(timestamp: Option<DateTime<Utc>>, message: Option<String>) -> Self {
        Self { timestamp, message }
    }

    /// Build an entry from epoch milliseconds, the unit CloudWatch uses.
    /// Out-of-range values are treated as a missing timestamp.
    pub fn from_millis(millis: Option<i64>, message: Option<String>) -> Self {
        Self {
            timestamp: millis.and_then(DateTime::from_timestamp_millis),
            message,
        }
    }
}

/// Entries from one stream, ascending by timestamp.
/// Entries without a timestamp come first, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogBatch {
    entries: Vec<LogEntry>,
}

impl LogBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sort `entries` into batch order. The sort is stable so entries with
    /// equal (or missing) timestamps keep the order they were given in.
    pub fn from_unordered(mut entries: Vec<LogEntry>) -> Self {
        entries.sort_by_key(|entry| entry.timestamp);
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}
