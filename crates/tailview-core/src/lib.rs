#![forbid(unsafe_code)]

//! Data model and pure filtering/search primitives for the tailview log
//! stream viewer.
//!
//! This crate holds everything that is a pure function of the entry
//! sequence and the active filter controls: the [`LogEntry`] record, the
//! level/time-range/text filter pipeline, case-insensitive search-match
//! splitting, and export formatting. Viewport state (windowing, follow
//! mode, cursor, keys) lives in `tailview-viewer`.
//!
//! # Feature flags
//!
//! - `serde`: derive `Serialize`/`Deserialize` on the entry model for
//!   transport decoding.

pub mod entry;
pub mod export;
pub mod filter;
pub mod highlight;
pub mod level;
pub mod time_range;

pub use entry::LogEntry;
pub use filter::{FilterSet, LevelFilter, filter_entries};
pub use highlight::{HighlightSpan, HighlightSpans, highlight};
pub use level::{Level, ParseLevelError};
pub use time_range::{TimeRange, TimeRangeScrubber};
