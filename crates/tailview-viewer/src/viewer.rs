#![forbid(unsafe_code)]

//! The stream viewer.
//!
//! `StreamViewer` owns one entry sequence and every piece of derived state:
//! the filtered view, the render window, the follow pin, and the marker
//! cursor. All recomputation is synchronous inside the handler of the
//! triggering event (append, scroll, filter change, key press), and a
//! single `refresh` path enforces the snapshot ordering: the filtered
//! view always reflects every pending input change before the window is
//! recomputed against its length.
//!
//! The viewer emits rendering instructions ([`RenderWindow`], via
//! [`ViewerSurface`]) and two host-side effects (clipboard export text,
//! stream toggling); it never fetches or persists anything itself.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use tailview_core::{
    FilterSet, HighlightSpans, LevelFilter, LogEntry, TimeRangeScrubber, export, filter_entries,
    highlight,
};

use crate::follow::{FollowController, FollowMode};
use crate::host::ScrollHost;
use crate::keys::{InputSource, Key, KeyAction, SubscriptionId, action_for};
use crate::markers::{Direction, clamp_cursor, next_marker};
use crate::window::{DEFAULT_OVERSCAN, RenderWindow, compute_window, content_height, tail_offset};

/// Layout and behavior constants for one viewer instance.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Fixed row height in pixels. Caller-guaranteed positive.
    pub item_height: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
    /// Rows rendered beyond the viewport on each side of the window.
    pub overscan: usize,
    /// Distance from the bottom (px) still counting as "at the tail".
    pub bottom_tolerance: f32,
    /// Whether the hosting surface offers live streaming at all.
    pub enable_live_streaming: bool,
    /// Initial producer streaming state.
    pub streaming: bool,
}

impl ViewerConfig {
    /// Config with the given layout constants and default tuning.
    #[must_use]
    pub fn new(item_height: f32, viewport_height: f32) -> Self {
        Self {
            item_height,
            viewport_height,
            overscan: DEFAULT_OVERSCAN,
            bottom_tolerance: FollowController::DEFAULT_BOTTOM_TOLERANCE,
            enable_live_streaming: false,
            streaming: false,
        }
    }

    /// Set the overscan row count.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Set the bottom tolerance in pixels.
    #[must_use]
    pub fn with_bottom_tolerance(mut self, tolerance: f32) -> Self {
        self.bottom_tolerance = tolerance;
        self
    }

    /// Enable live streaming with the given initial producer state.
    #[must_use]
    pub fn with_live_streaming(mut self, streaming: bool) -> Self {
        self.enable_live_streaming = true;
        self.streaming = streaming;
        self
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::new(24.0, 240.0)
    }
}

/// Host-side effect requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEffect {
    /// Hand focus to the search input.
    FocusSearch,
}

/// What the hosting surface should draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerSurface {
    /// No entries at all. No filtering, windowing, or navigation runs;
    /// the host shows a placeholder and, when offered, a stream control.
    Placeholder {
        /// Whether to render a start/pause control.
        offer_stream_toggle: bool,
    },
    /// The windowed stream.
    Stream(RenderWindow),
}

type StreamToggleHook = Box<dyn FnMut(bool)>;
type CopyHook = Box<dyn FnMut(&str)>;

/// Orchestrates filtering, windowing, follow mode, and marker navigation
/// over an externally produced, append-only entry sequence.
pub struct StreamViewer {
    config: ViewerConfig,
    entries: Vec<LogEntry>,
    seen_ids: FxHashSet<String>,
    level_filter: LevelFilter,
    query: String,
    scrubber: TimeRangeScrubber,
    /// Indices into `entries`; fully recomputed by `refresh`.
    filtered: Vec<usize>,
    scroll_offset: f32,
    cursor: Option<usize>,
    follow: FollowController,
    window: RenderWindow,
    streaming: bool,
    on_stream_toggle: Option<StreamToggleHook>,
    on_copy_filtered: Option<CopyHook>,
    subscription: Option<SubscriptionId>,
}

impl StreamViewer {
    /// New viewer with no entries.
    #[must_use]
    pub fn new(config: ViewerConfig) -> Self {
        let follow = FollowController::new(config.bottom_tolerance);
        let streaming = config.enable_live_streaming && config.streaming;
        Self {
            config,
            entries: Vec::new(),
            seen_ids: FxHashSet::default(),
            level_filter: LevelFilter::All,
            query: String::new(),
            scrubber: TimeRangeScrubber::new(),
            filtered: Vec::new(),
            scroll_offset: 0.0,
            cursor: None,
            follow,
            window: RenderWindow::EMPTY,
            streaming,
            on_stream_toggle: None,
            on_copy_filtered: None,
            subscription: None,
        }
    }

    /// Register the live-stream toggle hook. Absence disables the
    /// affordance; it is never an error.
    #[must_use]
    pub fn with_stream_toggle_hook(mut self, hook: impl FnMut(bool) + 'static) -> Self {
        self.on_stream_toggle = Some(Box::new(hook));
        self
    }

    /// Register the copy-filtered hook. It receives the formatted export
    /// text; clipboard transport and its failures are the host's concern.
    #[must_use]
    pub fn with_copy_hook(mut self, hook: impl FnMut(&str) + 'static) -> Self {
        self.on_copy_filtered = Some(Box::new(hook));
        self
    }

    // --- ingestion -----------------------------------------------------

    /// Append one entry and refresh the derived state.
    pub fn push(&mut self, entry: LogEntry) {
        if self.admit(entry) {
            self.refresh();
        }
    }

    /// Append a batch with a single recompute. This is also how entries
    /// buffered upstream while streaming was paused are delivered.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = LogEntry>) {
        let mut admitted = false;
        for entry in batch {
            admitted |= self.admit(entry);
        }
        if admitted {
            self.refresh();
        }
    }

    /// Validate and store one entry. Returns false when dropped.
    fn admit(&mut self, entry: LogEntry) -> bool {
        if !self.accepting_appends() {
            trace!(id = %entry.id, "append dropped: streaming paused");
            return false;
        }
        if !self.seen_ids.insert(entry.id.clone()) {
            warn!(id = %entry.id, "duplicate entry id dropped");
            return false;
        }
        self.scrubber.observe(entry.timestamp);
        self.entries.push(entry);
        true
    }

    /// The live-tailing flag consulted by the append path. When the
    /// surface offers no streaming at all, appends are batch loads and
    /// always accepted.
    fn accepting_appends(&self) -> bool {
        !self.config.enable_live_streaming || self.streaming
    }

    /// Drop all entries and derived state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen_ids.clear();
        self.scrubber = TimeRangeScrubber::new();
        self.cursor = None;
        self.scroll_offset = 0.0;
        self.refresh();
    }

    // --- filter controls -----------------------------------------------

    /// Set the severity predicate.
    pub fn set_level_filter(&mut self, level: LevelFilter) {
        if self.level_filter != level {
            self.level_filter = level;
            self.refresh();
        }
    }

    /// Set the search text. The query is both a filter predicate and the
    /// pattern the highlighter marks.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.refresh();
        }
    }

    /// Pin the lower time bound.
    pub fn set_range_start(&mut self, t: i64) {
        self.scrubber.set_start(t);
        self.refresh();
    }

    /// Pin the upper time bound.
    pub fn set_range_end(&mut self, t: i64) {
        self.scrubber.set_end(t);
        self.refresh();
    }

    /// Return to the full time bounds.
    pub fn reset_range(&mut self) {
        self.scrubber.reset();
        self.refresh();
    }

    /// The time-range scrubber, for bound display.
    #[must_use]
    pub const fn scrubber(&self) -> &TimeRangeScrubber {
        &self.scrubber
    }

    // --- derived-state recompute ---------------------------------------

    /// Recompute the filtered view, then cursor validity, then the scroll
    /// offset, then the window, in that order, so the window is never
    /// computed against a stale view length.
    fn refresh(&mut self) {
        let filters = FilterSet {
            level: self.level_filter,
            query: self.query.clone(),
            range: self.scrubber.active(),
        };
        self.filtered = filter_entries(&self.entries, &filters);
        self.cursor = clamp_cursor(self.cursor, self.filtered.len());

        let tail = self.tail_offset();
        if let Some(forced) = self.follow.on_append(tail) {
            self.scroll_offset = forced;
        } else {
            // Appends never move an unpinned viewport; a shrink may force
            // the offset back into range.
            self.scroll_offset = self.scroll_offset.clamp(0.0, tail);
        }
        self.recompute_window();
        trace!(
            total = self.entries.len(),
            filtered = self.filtered.len(),
            pinned = self.follow.is_pinned(),
            "view refreshed"
        );
    }

    fn recompute_window(&mut self) {
        self.window = compute_window(
            self.scroll_offset,
            self.config.item_height,
            self.config.viewport_height,
            self.filtered.len(),
            self.config.overscan,
        );
    }

    fn content_height(&self) -> f32 {
        content_height(self.filtered.len(), self.config.item_height)
    }

    fn tail_offset(&self) -> f32 {
        tail_offset(
            self.filtered.len(),
            self.config.item_height,
            self.config.viewport_height,
        )
    }

    // --- scrolling and follow ------------------------------------------

    /// Handle a viewport scroll event at `offset` pixels.
    pub fn handle_scroll(&mut self, offset: f32) {
        let offset = offset.max(0.0);
        self.follow
            .on_scroll(offset, self.content_height(), self.config.viewport_height);
        self.scroll_offset = offset.min(self.tail_offset());
        self.recompute_window();
    }

    /// Read the host's scroll position (a scroll event arrived).
    pub fn sync_from_host(&mut self, host: &dyn ScrollHost) {
        self.handle_scroll(host.scroll_offset());
    }

    /// Write the viewer's scroll position to the host (after a forced
    /// move: pinned append, marker jump, jump-to-tail).
    pub fn sync_to_host(&self, host: &mut dyn ScrollHost) {
        host.set_scroll_offset(self.scroll_offset);
    }

    /// Explicitly re-engage the pin and move to the tail.
    pub fn jump_to_tail(&mut self) {
        self.follow.pin();
        self.scroll_offset = self.tail_offset();
        self.recompute_window();
    }

    /// Flip the pin. Re-engaging jumps to the tail.
    pub fn toggle_follow(&mut self) {
        match self.follow.toggle() {
            FollowMode::Pinned => {
                self.scroll_offset = self.tail_offset();
                self.recompute_window();
            }
            FollowMode::Unpinned => {}
        }
    }

    /// True while the viewport is pinned to the newest entry.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.follow.is_pinned()
    }

    // --- marker navigation ---------------------------------------------

    /// Jump to the next warn/error marker after the cursor.
    pub fn next_marker(&mut self) -> Option<usize> {
        self.jump_marker(Direction::Forward)
    }

    /// Jump to the previous warn/error marker before the cursor.
    pub fn prev_marker(&mut self) -> Option<usize> {
        self.jump_marker(Direction::Backward)
    }

    fn jump_marker(&mut self, direction: Direction) -> Option<usize> {
        let found = next_marker(&self.entries, &self.filtered, self.cursor, direction)?;
        self.cursor = Some(found);
        // Top-align the marker row, clamped to the scroll range. The jump
        // counts as a scroll observation, so landing away from the tail
        // drops the pin instead of fighting the next append.
        let offset = (found as f32 * self.config.item_height).min(self.tail_offset());
        self.follow
            .on_scroll(offset, self.content_height(), self.config.viewport_height);
        self.scroll_offset = offset;
        self.recompute_window();
        debug!(index = found, ?direction, "marker jump");
        Some(found)
    }

    /// Clear the marker cursor.
    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Current cursor into the filtered view.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of warn/error entries in the filtered view.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.filtered
            .iter()
            .filter_map(|&idx| self.entries.get(idx))
            .filter(|entry| entry.level.is_marker())
            .count()
    }

    // --- keyboard surface ----------------------------------------------

    /// Dispatch a key press. Returns a host effect when the binding's
    /// action lives outside the viewer.
    pub fn handle_key(&mut self, key: Key) -> Option<HostEffect> {
        match action_for(key)? {
            KeyAction::FocusSearch => return Some(HostEffect::FocusSearch),
            KeyAction::ToggleFollow => self.toggle_follow(),
            KeyAction::NextMarker => {
                self.next_marker();
            }
            KeyAction::PrevMarker => {
                self.prev_marker();
            }
            KeyAction::ClearCursor => self.clear_cursor(),
        }
        None
    }

    /// Subscribe to the host's key events. A second mount without an
    /// unmount is a no-op; one live subscription per viewer.
    pub fn mount(&mut self, source: &mut dyn InputSource) {
        if self.subscription.is_none() {
            self.subscription = Some(source.subscribe());
        }
    }

    /// Release the key subscription, if any.
    pub fn unmount(&mut self, source: &mut dyn InputSource) {
        if let Some(id) = self.subscription.take() {
            source.unsubscribe(id);
        }
    }

    /// True while subscribed to an input source.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    // --- streaming -----------------------------------------------------

    /// User toggled the start/pause control. Notifies the producer through
    /// the hook and flips the local accept flag.
    pub fn toggle_streaming(&mut self) {
        if !self.config.enable_live_streaming {
            return;
        }
        self.streaming = !self.streaming;
        debug!(streaming = self.streaming, "stream toggled");
        let next = self.streaming;
        if let Some(hook) = self.on_stream_toggle.as_mut() {
            hook(next);
        }
    }

    /// Producer-side streaming state changed (no hook invocation).
    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// True while accepting and displaying live appends.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.streaming
    }

    // --- export --------------------------------------------------------

    /// Format the filtered view and hand it to the copy hook. A missing
    /// hook disables the affordance; viewer state never changes either way.
    pub fn copy_filtered(&mut self) {
        if self.on_copy_filtered.is_none() {
            return;
        }
        let text = export::format_entries(
            self.filtered
                .iter()
                .filter_map(|&idx| self.entries.get(idx)),
        );
        if let Some(hook) = self.on_copy_filtered.as_mut() {
            hook(&text);
        }
    }

    // --- view access ---------------------------------------------------

    /// What the hosting surface should draw right now.
    #[must_use]
    pub fn surface(&self) -> ViewerSurface {
        if self.entries.is_empty() {
            ViewerSurface::Placeholder {
                offer_stream_toggle: self.config.enable_live_streaming,
            }
        } else {
            ViewerSurface::Stream(self.window)
        }
    }

    /// The current render window.
    #[must_use]
    pub const fn window(&self) -> RenderWindow {
        self.window
    }

    /// Rows in the current window as `(filtered index, entry)`.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &LogEntry)> + '_ {
        (self.window.start..self.window.end).filter_map(move |view_idx| {
            self.filtered
                .get(view_idx)
                .and_then(|&entry_idx| self.entries.get(entry_idx))
                .map(|entry| (view_idx, entry))
        })
    }

    /// Split a filtered row's message around the active query for
    /// presentation.
    #[must_use]
    pub fn spans_for(&self, view_idx: usize) -> Option<HighlightSpans> {
        let &entry_idx = self.filtered.get(view_idx)?;
        let entry = self.entries.get(entry_idx)?;
        Some(highlight(&entry.message, &self.query))
    }

    /// Total entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the filtered view.
    #[must_use]
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Current scroll offset in pixels.
    #[must_use]
    pub const fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }
}

impl fmt::Debug for StreamViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamViewer")
            .field("entries", &self.entries.len())
            .field("filtered", &self.filtered.len())
            .field("scroll_offset", &self.scroll_offset)
            .field("cursor", &self.cursor)
            .field("follow", &self.follow)
            .field("window", &self.window)
            .field("streaming", &self.streaming)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tailview_core::Level;

    fn entry(id: &str, ts: i64, level: Level, message: &str) -> LogEntry {
        LogEntry::new(id, ts, level, message)
    }

    fn info(id: &str, ts: i64) -> LogEntry {
        entry(id, ts, Level::Info, "line")
    }

    fn viewer_with(count: usize, config: ViewerConfig) -> StreamViewer {
        let mut viewer = StreamViewer::new(config);
        viewer.extend((0..count).map(|i| info(&format!("e{i}"), i as i64)));
        viewer
    }

    // --- windowing -----------------------------------------------------

    #[test]
    fn fifty_entries_render_fifteen_rows() {
        // 240px viewport / 24px rows = 10 visible + 5 overscan.
        let mut viewer = viewer_with(50, ViewerConfig::new(24.0, 240.0));
        viewer.toggle_follow(); // unpin so manual offsets stick
        for offset in [0.0, 48.0, 240.0, 700.0] {
            viewer.handle_scroll(offset);
            assert!(
                viewer.window().len() <= 15,
                "offset {offset}: {} rows",
                viewer.window().len()
            );
        }
        viewer.handle_scroll(0.0);
        assert_eq!(viewer.window().len(), 15);
    }

    #[test]
    fn window_is_bounded_for_huge_logs() {
        let viewer = viewer_with(10_000, ViewerConfig::new(24.0, 240.0));
        assert!(viewer.window().len() <= 15);
    }

    // --- filtering -----------------------------------------------------

    #[test]
    fn level_filter_narrows_view() {
        let mut viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0));
        viewer.extend((0..47).map(|i| info(&format!("i{i}"), i as i64)));
        viewer.extend((0..3).map(|i| entry(&format!("x{i}"), 100 + i as i64, Level::Error, "boom")));
        viewer.set_level_filter(LevelFilter::Only(Level::Error));
        assert_eq!(viewer.filtered_len(), 3);
        viewer.set_level_filter(LevelFilter::All);
        assert_eq!(viewer.filtered_len(), 50);
    }

    #[test]
    fn query_narrows_view_and_drives_spans() {
        let mut viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0));
        viewer.push(entry("a", 0, Level::Info, "Build failed"));
        viewer.push(entry("b", 1, Level::Info, "all good"));
        viewer.set_query("fail");
        assert_eq!(viewer.filtered_len(), 1);
        let spans = viewer.spans_for(0).unwrap();
        let flags: Vec<(&str, bool)> =
            spans.iter().map(|s| (s.text.as_str(), s.matched)).collect();
        assert_eq!(
            flags,
            vec![("Build ", false), ("fail", true), ("ed", false)]
        );
    }

    #[test]
    fn inverted_range_empties_view_without_error() {
        let mut viewer = viewer_with(10, ViewerConfig::new(24.0, 240.0));
        viewer.set_range_start(500);
        viewer.set_range_end(100);
        assert_eq!(viewer.filtered_len(), 0);
        assert!(viewer.window().is_empty());
        viewer.reset_range();
        assert_eq!(viewer.filtered_len(), 10);
    }

    // --- follow --------------------------------------------------------

    #[test]
    fn pinned_append_moves_to_new_tail() {
        // 10 rows * 20px - 100px viewport = 100px prior tail.
        let mut viewer = viewer_with(10, ViewerConfig::new(20.0, 100.0));
        assert!(viewer.is_pinned());
        assert_eq!(viewer.scroll_offset(), 100.0);
        viewer.push(info("new", 99));
        assert_eq!(viewer.scroll_offset(), 120.0);
    }

    #[test]
    fn unpinned_append_leaves_offset_alone() {
        let mut viewer = viewer_with(50, ViewerConfig::new(20.0, 100.0));
        viewer.handle_scroll(200.0); // far from the 900px tail → unpins
        assert!(!viewer.is_pinned());
        viewer.push(info("new", 99));
        assert_eq!(viewer.scroll_offset(), 200.0);
    }

    #[test]
    fn scrolling_to_bottom_does_not_repin() {
        let mut viewer = viewer_with(50, ViewerConfig::new(20.0, 100.0));
        viewer.handle_scroll(200.0);
        viewer.handle_scroll(900.0); // exact tail
        assert!(!viewer.is_pinned());
        viewer.jump_to_tail();
        assert!(viewer.is_pinned());
    }

    #[test]
    fn host_sync_round_trip() {
        use crate::host::{MemoryScrollHost, ScrollHost};
        let mut viewer = viewer_with(50, ViewerConfig::new(20.0, 100.0));
        let mut host = MemoryScrollHost::default();
        viewer.sync_to_host(&mut host);
        assert_eq!(host.scroll_offset(), 900.0);

        host.set_scroll_offset(140.0);
        viewer.sync_from_host(&host);
        assert!(!viewer.is_pinned());
        assert_eq!(viewer.scroll_offset(), 140.0);
    }

    // --- markers -------------------------------------------------------

    fn marker_fixture() -> StreamViewer {
        let mut viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0));
        let mut batch = Vec::new();
        for i in 0..10 {
            let level = if i == 5 || i == 8 {
                Level::Error
            } else {
                Level::Info
            };
            batch.push(entry(&format!("e{i}"), i, level, "msg"));
        }
        viewer.extend(batch);
        viewer
    }

    #[test]
    fn marker_walk_visits_each_once() {
        let mut viewer = marker_fixture();
        assert_eq!(viewer.next_marker(), Some(5));
        assert_eq!(viewer.cursor(), Some(5));
        assert_eq!(viewer.next_marker(), Some(8));
        assert_eq!(viewer.next_marker(), None);
        assert_eq!(viewer.cursor(), Some(8));
    }

    #[test]
    fn marker_jump_top_aligns_and_may_unpin() {
        let mut viewer = StreamViewer::new(ViewerConfig::new(20.0, 100.0));
        let mut batch: Vec<LogEntry> = (0..50).map(|i| info(&format!("e{i}"), i)).collect();
        batch[10] = entry("e10", 10, Level::Error, "boom");
        viewer.extend(batch);
        assert!(viewer.is_pinned());
        assert_eq!(viewer.next_marker(), Some(10));
        assert_eq!(viewer.scroll_offset(), 200.0);
        assert!(!viewer.is_pinned());
    }

    #[test]
    fn escape_clears_cursor() {
        let mut viewer = marker_fixture();
        viewer.next_marker();
        assert!(viewer.cursor().is_some());
        assert_eq!(viewer.handle_key(Key::Escape), None);
        assert_eq!(viewer.cursor(), None);
    }

    #[test]
    fn cursor_survives_filter_shrink_clamped() {
        let mut viewer = marker_fixture();
        viewer.next_marker();
        viewer.next_marker();
        assert_eq!(viewer.cursor(), Some(8));
        viewer.set_query("msg"); // still 10 entries
        assert_eq!(viewer.cursor(), Some(8));
        viewer.set_level_filter(LevelFilter::Only(Level::Error)); // 2 entries
        assert_eq!(viewer.cursor(), Some(1));
        viewer.set_query("absent");
        assert_eq!(viewer.cursor(), None);
    }

    #[test]
    fn marker_count_follows_filters() {
        let mut viewer = marker_fixture();
        assert_eq!(viewer.marker_count(), 2);
        viewer.set_level_filter(LevelFilter::Only(Level::Info));
        assert_eq!(viewer.marker_count(), 0);
    }

    // --- keys ----------------------------------------------------------

    #[test]
    fn focus_search_is_a_host_effect() {
        let mut viewer = marker_fixture();
        assert_eq!(viewer.handle_key(Key::Char('f')), Some(HostEffect::FocusSearch));
        assert_eq!(viewer.handle_key(Key::Char('F')), Some(HostEffect::FocusSearch));
    }

    #[test]
    fn follow_toggle_key_flips_pin() {
        let mut viewer = marker_fixture();
        assert!(viewer.is_pinned());
        viewer.handle_key(Key::Char('l'));
        assert!(!viewer.is_pinned());
        viewer.handle_key(Key::Char('L'));
        assert!(viewer.is_pinned());
    }

    #[test]
    fn bracket_keys_navigate_markers() {
        let mut viewer = marker_fixture();
        viewer.handle_key(Key::Char(']'));
        assert_eq!(viewer.cursor(), Some(5));
        viewer.handle_key(Key::Char(']'));
        assert_eq!(viewer.cursor(), Some(8));
        viewer.handle_key(Key::Char('['));
        assert_eq!(viewer.cursor(), Some(5));
    }

    // --- mount guard ---------------------------------------------------

    #[derive(Default)]
    struct CountingSource {
        live: Vec<SubscriptionId>,
        next: SubscriptionId,
    }

    impl InputSource for CountingSource {
        fn subscribe(&mut self) -> SubscriptionId {
            self.next += 1;
            self.live.push(self.next);
            self.next
        }

        fn unsubscribe(&mut self, id: SubscriptionId) {
            self.live.retain(|&live| live != id);
        }
    }

    #[test]
    fn repeated_mounts_hold_one_subscription() {
        let mut viewer = StreamViewer::new(ViewerConfig::default());
        let mut source = CountingSource::default();
        viewer.mount(&mut source);
        viewer.mount(&mut source);
        assert_eq!(source.live.len(), 1);
        assert!(viewer.is_mounted());
        viewer.unmount(&mut source);
        assert!(source.live.is_empty());
        assert!(!viewer.is_mounted());
        viewer.unmount(&mut source); // second unmount is a no-op
        assert!(source.live.is_empty());
    }

    // --- streaming -----------------------------------------------------

    #[test]
    fn paused_stream_drops_appends_until_resumed() {
        let config = ViewerConfig::new(24.0, 240.0).with_live_streaming(true);
        let mut viewer = StreamViewer::new(config);
        viewer.push(info("a", 0));
        assert_eq!(viewer.len(), 1);

        viewer.toggle_streaming(); // pause
        viewer.push(info("b", 1));
        assert_eq!(viewer.len(), 1);

        viewer.toggle_streaming(); // resume; missed entries arrive as a batch
        viewer.extend([info("b", 1), info("c", 2)]);
        assert_eq!(viewer.len(), 3);
    }

    #[test]
    fn stream_toggle_invokes_hook() {
        let seen: Rc<RefCell<Vec<bool>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let config = ViewerConfig::new(24.0, 240.0).with_live_streaming(true);
        let mut viewer = StreamViewer::new(config)
            .with_stream_toggle_hook(move |next| sink.borrow_mut().push(next));
        viewer.toggle_streaming();
        viewer.toggle_streaming();
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn toggle_without_live_streaming_is_inert() {
        let called: Rc<RefCell<u32>> = Rc::default();
        let sink = Rc::clone(&called);
        let mut viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0))
            .with_stream_toggle_hook(move |_| *sink.borrow_mut() += 1);
        viewer.toggle_streaming();
        assert_eq!(*called.borrow(), 0);
    }

    // --- duplicates ----------------------------------------------------

    #[test]
    fn duplicate_ids_are_dropped() {
        let mut viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0));
        viewer.push(info("same", 0));
        viewer.push(info("same", 1));
        assert_eq!(viewer.len(), 1);
    }

    // --- export --------------------------------------------------------

    #[test]
    fn copy_filtered_formats_current_view() {
        let copied: Rc<RefCell<String>> = Rc::default();
        let sink = Rc::clone(&copied);
        let mut viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0))
            .with_copy_hook(move |text| *sink.borrow_mut() = text.to_string());

        viewer.push(entry("a", 0, Level::Info, "kept"));
        viewer.push(entry("b", 1_000, Level::Error, "also kept"));
        viewer.push(entry("c", 2_000, Level::Debug, "filtered out"));
        viewer.set_query("kept");
        viewer.copy_filtered();

        assert_eq!(
            *copied.borrow(),
            "[1970-01-01T00:00:00.000Z] INFO: kept\n\
             [1970-01-01T00:00:01.000Z] ERROR: also kept"
        );
    }

    #[test]
    fn copy_without_hook_is_inert() {
        let mut viewer = viewer_with(3, ViewerConfig::new(24.0, 240.0));
        viewer.copy_filtered(); // must not panic or change state
        assert_eq!(viewer.filtered_len(), 3);
    }

    // --- empty state ---------------------------------------------------

    #[test]
    fn empty_viewer_shows_placeholder() {
        let viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0).with_live_streaming(true));
        assert_eq!(
            viewer.surface(),
            ViewerSurface::Placeholder {
                offer_stream_toggle: true
            }
        );
        assert!(viewer.window().is_empty());
    }

    #[test]
    fn placeholder_without_streaming_offers_no_toggle() {
        let viewer = StreamViewer::new(ViewerConfig::new(24.0, 240.0));
        assert_eq!(
            viewer.surface(),
            ViewerSurface::Placeholder {
                offer_stream_toggle: false
            }
        );
    }

    #[test]
    fn populated_viewer_shows_stream() {
        let viewer = viewer_with(3, ViewerConfig::new(24.0, 240.0));
        match viewer.surface() {
            ViewerSurface::Stream(window) => assert_eq!(window.len(), 3),
            other => panic!("expected stream surface, got {other:?}"),
        }
    }

    // --- visible rows --------------------------------------------------

    #[test]
    fn visible_yields_window_rows_in_order() {
        let mut viewer = viewer_with(50, ViewerConfig::new(20.0, 100.0));
        viewer.handle_scroll(200.0); // start = 10
        let rows: Vec<usize> = viewer.visible().map(|(view_idx, _)| view_idx).collect();
        assert_eq!(rows.first(), Some(&10));
        assert_eq!(rows.len(), viewer.window().len());
    }

    #[test]
    fn clear_resets_everything() {
        let mut viewer = viewer_with(20, ViewerConfig::new(20.0, 100.0));
        viewer.next_marker();
        viewer.clear();
        assert!(viewer.is_empty());
        assert_eq!(viewer.filtered_len(), 0);
        assert_eq!(viewer.cursor(), None);
        assert_eq!(viewer.scroll_offset(), 0.0);
        assert!(viewer.window().is_empty());
        // The same ids may be pushed again after a clear.
        viewer.push(info("e0", 0));
        assert_eq!(viewer.len(), 1);
    }
}
