#![forbid(unsafe_code)]

//! Severity-marker navigation.
//!
//! Markers are entries at `warn` or `error` severity. Navigation scans the
//! filtered view strictly beyond the cursor in either direction, returning
//! the filtered index of the first marker found. The scan is linear over
//! the filtered view; it never touches the render window.

use tailview_core::LogEntry;

/// Scan direction relative to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward newer entries (higher filtered indices).
    Forward,
    /// Toward older entries (lower filtered indices).
    Backward,
}

/// Find the filtered index of the first marker strictly beyond `from`.
///
/// `filtered` holds indices into `entries` (the filtered view). With no
/// cursor, a forward scan starts at the beginning of the view and a
/// backward scan at its end. Returns `None` when the scanned direction
/// holds no marker.
#[must_use]
pub fn next_marker(
    entries: &[LogEntry],
    filtered: &[usize],
    from: Option<usize>,
    direction: Direction,
) -> Option<usize> {
    let is_marker =
        |&entry_idx: &usize| entries.get(entry_idx).is_some_and(|e| e.level.is_marker());

    match direction {
        Direction::Forward => {
            let first = from.map_or(0, |i| i.saturating_add(1));
            filtered
                .iter()
                .enumerate()
                .skip(first)
                .find(|(_, entry_idx)| is_marker(entry_idx))
                .map(|(view_idx, _)| view_idx)
        }
        Direction::Backward => {
            let end = from.unwrap_or(filtered.len()).min(filtered.len());
            filtered[..end]
                .iter()
                .enumerate()
                .rev()
                .find(|(_, entry_idx)| is_marker(entry_idx))
                .map(|(view_idx, _)| view_idx)
        }
    }
}

/// Re-clamp a cursor after the filtered view changed.
///
/// A cursor beyond the new length clamps to the last index; a cursor into
/// an empty view clears. Stale indices never survive a filter recompute.
#[must_use]
pub fn clamp_cursor(cursor: Option<usize>, filtered_len: usize) -> Option<usize> {
    match cursor {
        Some(_) if filtered_len == 0 => None,
        Some(idx) => Some(idx.min(filtered_len - 1)),
        None => None,
    }
}
