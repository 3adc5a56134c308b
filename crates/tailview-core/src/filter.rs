#![forbid(unsafe_code)]

//! The filter pipeline: level, time-range, and text predicates over the raw
//! entry sequence.
//!
//! All three predicates are ANDed and side-effect-free, so evaluation order
//! is irrelevant and the same inputs always produce the same view. The
//! output preserves input order and is expressed as indices into the entry
//! sequence; the filtered view borrows, it never clones lines.

use crate::entry::LogEntry;
use crate::highlight::contains_ignore_case;
use crate::level::Level;
use crate::time_range::TimeRange;

/// Level predicate: everything, or one exact severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    /// Every entry passes.
    #[default]
    All,
    /// Only entries at exactly this severity pass.
    Only(Level),
}

impl LevelFilter {
    /// True when an entry at `level` passes.
    #[must_use]
    pub const fn admits(self, level: Level) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only as u8 == level as u8,
        }
    }
}

/// The three ANDed predicates applied to the raw entry sequence.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    /// Severity predicate.
    pub level: LevelFilter,
    /// Case-insensitive substring predicate; empty means "pass everything".
    pub query: String,
    /// Inclusive timestamp bound. An inverted bound passes nothing.
    pub range: TimeRange,
}

impl FilterSet {
    /// True when `entry` passes all three predicates.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.level.admits(entry.level)
            && self.range.contains(entry.timestamp)
            && (self.query.is_empty() || contains_ignore_case(&entry.message, &self.query))
    }
}

/// Apply `filters` to `entries`, returning the indices of passing entries in
/// input order. Cost is proportional to the input length; nothing is cloned.
#[must_use]
pub fn filter_entries(entries: &[LogEntry], filters: &FilterSet) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| filters.matches(entry))
        .map(|(idx, _)| idx)
        .collect()
}
