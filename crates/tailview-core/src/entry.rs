#![forbid(unsafe_code)]

//! The log entry record.

use crate::level::Level;

/// A single structured log line.
///
/// Entries are produced externally and are immutable once appended. `id` is
/// unique within one viewer's lifetime; `timestamp` is epoch milliseconds.
/// Append order is authoritative for display; `timestamp` is consulted only
/// for range filtering and bound display, never for ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    /// Stable unique identifier.
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Severity.
    pub level: Level,
    /// Line content.
    pub message: String,
}

impl LogEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        timestamp: i64,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            level,
            message: message.into(),
        }
    }
}
