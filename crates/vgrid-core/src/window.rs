#![forbid(unsafe_code)]

//! Window calculator: scroll position → contiguous visible index range.
//!
//! Maps `[scroll_top, scroll_top + viewport_height)` onto row indices via
//! rank queries over the size model's prefix sums (O(log n) per scroll
//! event), then pads both ends with overscan rows to mask pop-in.

use crate::heights::SizeModel;

/// Inclusive contiguous range of row indices intersecting the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// First index in the range.
    pub start: usize,
    /// Last index in the range (inclusive).
    pub end: usize,
}

impl VisibleRange {
    /// Number of rows in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Whether `index` falls inside the range.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Compute the visible range for a scroll position.
///
/// Guarantees every row occupying any pixel of
/// `[scroll_top, scroll_top + viewport_height)` lies within the returned
/// range, before overscan is even applied. Returns `None` when there is
/// nothing to window (no rows, or a zero-height viewport).
///
/// Edge case: a viewport at least as tall as the content disables
/// windowing and returns the full range.
#[must_use]
pub fn visible_range(
    sizes: &SizeModel,
    scroll_top: u64,
    viewport_height: u32,
    overscan: usize,
) -> Option<VisibleRange> {
    let n = sizes.row_count();
    if n == 0 || viewport_height == 0 {
        return None;
    }
    if u64::from(viewport_height) >= sizes.total_height() {
        return Some(VisibleRange { start: 0, end: n - 1 });
    }

    let start = sizes.row_at(scroll_top);
    // Exclusive bottom edge: a row starting exactly at the bottom is out.
    let bottom = scroll_top.saturating_add(u64::from(viewport_height));
    let end = sizes.row_at(bottom - 1);

    Some(VisibleRange {
        start: start.saturating_sub(overscan),
        end: (end + overscan).min(n - 1),
    })
}
