#![forbid(unsafe_code)]

//! Range extractor: visible range ∪ forced includes → render set.
//!
//! Produces the sorted, deduplicated list of indices that must actually
//! exist in the render output. A forced index outside the visible range
//! (the expanded row scrolled off-screen) still renders at its true
//! prefix-sum offset; it is never re-ordered to a viewport edge.
//!
//! As an observable side effect, every extraction advances the session's
//! scroll frontier to the visible range's end index when that exceeds the
//! stored maximum. This is the sole write path for the frontier.

use smallvec::SmallVec;

use crate::session::ViewSession;
use crate::window::VisibleRange;

/// Render set: ascending, deduplicated row indices. Inline capacity covers
/// a typical viewport-plus-overscan window without allocating.
pub type RenderSet = SmallVec<[usize; 64]>;

/// Union the visible range with the forced-include set.
///
/// Returns indices in ascending order with no duplicates. With no visible
/// range (no viewport) nothing renders, forced includes included, and the
/// frontier does not move.
///
/// # Panics
///
/// Panics if any index reaches past the session's row count; that means
/// the visible range and the size model have desynced.
pub fn extract(
    range: Option<VisibleRange>,
    forced: impl IntoIterator<Item = usize>,
    session: &mut ViewSession,
) -> RenderSet {
    let mut out = RenderSet::new();
    let Some(range) = range else {
        return out;
    };
    assert!(
        range.end < session.row_count(),
        "visible range end {} out of range for {} rows",
        range.end,
        session.row_count()
    );

    out.extend(range.start..=range.end);
    for index in forced {
        assert!(
            index < session.row_count(),
            "forced index {index} out of range for {} rows",
            session.row_count()
        );
        if !range.contains(index) {
            let pos = out.partition_point(|&i| i < index);
            out.insert(pos, index);
        }
    }

    session.note_frontier(range.end);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> Option<VisibleRange> {
        Some(VisibleRange { start, end })
    }

    #[test]
    fn plain_range_passes_through() {
        let mut session = ViewSession::new(100, 10);
        let set = extract(range(10, 14), None, &mut session);
        assert_eq!(set.as_slice(), &[10, 11, 12, 13, 14]);
    }

    #[test]
    fn forced_below_range_prepends() {
        let mut session = ViewSession::new(100, 10);
        let set = extract(range(40, 43), Some(5), &mut session);
        assert_eq!(set.as_slice(), &[5, 40, 41, 42, 43]);
    }

    #[test]
    fn forced_above_range_appends() {
        let mut session = ViewSession::new(100, 10);
        let set = extract(range(10, 12), Some(80), &mut session);
        assert_eq!(set.as_slice(), &[10, 11, 12, 80]);
    }

    #[test]
    fn forced_inside_range_does_not_duplicate() {
        let mut session = ViewSession::new(100, 10);
        let set = extract(range(10, 14), Some(12), &mut session);
        assert_eq!(set.as_slice(), &[10, 11, 12, 13, 14]);
    }

    #[test]
    fn extraction_advances_frontier_monotonically() {
        let mut session = ViewSession::new(1000, 10);
        extract(range(0, 34), None, &mut session);
        assert_eq!(session.frontier(), 34);
        extract(range(500, 520), None, &mut session);
        assert_eq!(session.frontier(), 520);
        // Scrolling back up never lowers the frontier.
        extract(range(0, 34), None, &mut session);
        assert_eq!(session.frontier(), 520);
    }

    #[test]
    fn forced_index_does_not_move_frontier() {
        let mut session = ViewSession::new(1000, 10);
        extract(range(0, 20), Some(900), &mut session);
        assert_eq!(session.frontier(), 20);
    }

    #[test]
    fn no_range_renders_nothing() {
        let mut session = ViewSession::new(100, 10);
        let set = extract(None, Some(5), &mut session);
        assert!(set.is_empty());
        assert_eq!(session.frontier(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn forced_out_of_range_panics() {
        let mut session = ViewSession::new(10, 5);
        extract(range(0, 5), Some(10), &mut session);
    }
}
