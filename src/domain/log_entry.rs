use super::severity::Severity;
use chrono::{DateTime, Utc};

/// A single log line on its way to a sink.
///
/// The timestamp is taken once when the entry is created, so every retry of
/// the same entry carries the same time.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
        }
    }
}
