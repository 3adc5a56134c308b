#![forbid(unsafe_code)]

//! Plain-text export of a filtered view.
//!
//! The copy-filtered affordance hands the host one string: each entry as
//! `[RFC-3339 timestamp] LEVEL: message`, joined by newlines. Clipboard
//! transport (and its failures) belong to the host.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::entry::LogEntry;

/// Format one entry as `[RFC-3339 timestamp] LEVEL: message`.
///
/// A timestamp outside chrono's representable range falls back to the raw
/// millisecond value rather than panicking.
#[must_use]
pub fn format_entry(entry: &LogEntry) -> String {
    match DateTime::<Utc>::from_timestamp_millis(entry.timestamp) {
        Some(ts) => format!(
            "[{}] {}: {}",
            ts.to_rfc3339_opts(SecondsFormat::Millis, true),
            entry.level.as_upper_str(),
            entry.message
        ),
        None => format!(
            "[{}] {}: {}",
            entry.timestamp,
            entry.level.as_upper_str(),
            entry.message
        ),
    }
}

/// Format a sequence of entries, one line each.
#[must_use]
pub fn format_entries<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    entries
        .into_iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n")
}
