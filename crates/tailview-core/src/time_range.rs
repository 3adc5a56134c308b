#![forbid(unsafe_code)]

//! Timestamp range bounds for the filter pipeline.

use chrono::Utc;

use crate::entry::LogEntry;

/// Inclusive `[start, end]` bound in epoch milliseconds.
///
/// No `start <= end` invariant is enforced; an inverted range simply matches
/// nothing, which the filter pipeline relies on instead of erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    /// Inclusive lower bound.
    pub start: i64,
    /// Inclusive upper bound.
    pub end: i64,
}

impl TimeRange {
    /// The range admitting every representable timestamp.
    pub const ALL: TimeRange = TimeRange {
        start: i64::MIN,
        end: i64::MAX,
    };

    /// Create a range.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// True when `ts` falls inside the bounds. Inverted bounds match nothing.
    #[must_use]
    pub const fn contains(self, ts: i64) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// True when `start > end`.
    #[must_use]
    pub const fn is_inverted(self) -> bool {
        self.start > self.end
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::ALL
    }
}

/// Maintains the active `[start, end]` bound used as a filter predicate.
///
/// The full bounds follow the entry sequence: the start of the first entry,
/// the timestamp of the most recently appended one. Either end can be
/// overridden by the user; an untouched end keeps tracking the sequence so
/// live-tailing is not cut off by a stale upper bound. `reset` drops both
/// overrides.
#[derive(Debug, Clone)]
pub struct TimeRangeScrubber {
    bounds: TimeRange,
    seen_any: bool,
    start_override: Option<i64>,
    end_override: Option<i64>,
}

impl TimeRangeScrubber {
    /// Scrubber over an empty sequence: bounds are `[0, now]`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bounds: TimeRange::new(0, Utc::now().timestamp_millis()),
            seen_any: false,
            start_override: None,
            end_override: None,
        }
    }

    /// Scrubber initialized from an existing sequence.
    #[must_use]
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut scrubber = Self::new();
        for entry in entries {
            scrubber.observe(entry.timestamp);
        }
        scrubber
    }

    /// Record a newly appended entry's timestamp.
    ///
    /// The upper bound always becomes the latest observed value; append order
    /// is trusted, so no min/max scan happens.
    pub fn observe(&mut self, ts: i64) {
        if self.seen_any {
            self.bounds.end = ts;
        } else {
            self.bounds = TimeRange::new(ts, ts);
            self.seen_any = true;
        }
    }

    /// Pin the lower bound.
    pub fn set_start(&mut self, t: i64) {
        self.start_override = Some(t);
    }

    /// Pin the upper bound.
    pub fn set_end(&mut self, t: i64) {
        self.end_override = Some(t);
    }

    /// Drop both overrides, returning to the full bounds.
    pub fn reset(&mut self) {
        self.start_override = None;
        self.end_override = None;
    }

    /// The bound currently applied by the filter pipeline.
    #[must_use]
    pub fn active(&self) -> TimeRange {
        TimeRange::new(
            self.start_override.unwrap_or(self.bounds.start),
            self.end_override.unwrap_or(self.bounds.end),
        )
    }

    /// The full bounds of the observed sequence (for scrubber display).
    #[must_use]
    pub const fn full(&self) -> TimeRange {
        self.bounds
    }

    /// True when either end has been pinned by the user.
    #[must_use]
    pub const fn is_narrowed(&self) -> bool {
        self.start_override.is_some() || self.end_override.is_some()
    }
}

impl Default for TimeRangeScrubber {
    fn default() -> Self {
        Self::new()
    }
}
