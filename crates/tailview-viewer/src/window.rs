#![forbid(unsafe_code)]

//! Render-window math.
//!
//! Given a scroll offset, the fixed row height, and the viewport height,
//! compute the contiguous index range of the filtered view that must be
//! materialized. The returned range is bounded by the viewport capacity plus
//! overscan, never by the total item count. Render cost is O(viewport),
//! not O(log volume).

/// Extra rows rendered beyond the visible viewport to mask scroll-induced
/// pop-in. A tuning constant, not a correctness requirement.
pub const DEFAULT_OVERSCAN: usize = 5;

/// The contiguous slice of the filtered view to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderWindow {
    /// First index to render (inclusive).
    pub start: usize,
    /// One past the last index to render.
    pub end: usize,
    /// Vertical translation (px) applied to the rendered block so
    /// absolute-positioned rows land at their logical offset.
    pub pixel_offset: f32,
}

impl RenderWindow {
    /// The window rendering nothing.
    pub const EMPTY: RenderWindow = RenderWindow {
        start: 0,
        end: 0,
        pixel_offset: 0.0,
    };

    /// Number of rows to render.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when nothing is rendered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Compute the render window.
///
/// - `start = floor(scroll_offset / item_height)`, clamped to
///   `[0, total_items]`
/// - `end = min(start + ceil(viewport_height / item_height) + overscan,
///   total_items)`
/// - `pixel_offset = start * item_height`
///
/// `total_items == 0`, a non-positive `item_height` (caller-guaranteed
/// positive, guarded anyway so NaN never propagates), or a zero-height
/// viewport all short-circuit to [`RenderWindow::EMPTY`].
#[must_use]
pub fn compute_window(
    scroll_offset: f32,
    item_height: f32,
    viewport_height: f32,
    total_items: usize,
    overscan: usize,
) -> RenderWindow {
    if total_items == 0 || item_height <= 0.0 || viewport_height <= 0.0 {
        return RenderWindow::EMPTY;
    }

    let start = ((scroll_offset / item_height).floor().max(0.0) as usize).min(total_items);
    let visible_count = (viewport_height / item_height).ceil() as usize;
    let end = start.saturating_add(visible_count + overscan).min(total_items);

    RenderWindow {
        start,
        end,
        pixel_offset: start as f32 * item_height,
    }
}

/// Total scrollable content height for `total_items` rows.
#[must_use]
pub fn content_height(total_items: usize, item_height: f32) -> f32 {
    total_items as f32 * item_height
}

/// The scroll offset at which the last row rests against the viewport
/// bottom. Zero when everything already fits.
#[must_use]
pub fn tail_offset(total_items: usize, item_height: f32, viewport_height: f32) -> f32 {
    (content_height(total_items, item_height) - viewport_height).max(0.0)
}
