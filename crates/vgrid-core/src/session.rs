#![forbid(unsafe_code)]

//! Session-scoped view state: scroll frontier, revealed watermark,
//! selection, and the disposal flag.
//!
//! This is the explicit state container the view lifecycle owns and hands
//! by reference to the components that read or mutate it — never ambient
//! globals — so every transition is unit-testable without a live render
//! surface.
//!
//! Write paths are deliberately narrow: the frontier only moves through the
//! range extractor ([`note_frontier`](ViewSession::note_frontier) is
//! crate-private) and the watermark only through the frontier controller.

/// Per-view session state, created at mount and torn down with the view.
#[derive(Debug, Clone)]
pub struct ViewSession {
    row_count: usize,
    /// Highest end index the range extractor has ever requested.
    frontier: usize,
    /// Rows below this count render real content; the rest are skeletons.
    revealed: usize,
    /// The expanded row, if any. Cardinality <= 1 by design.
    selected: Option<usize>,
    disposed: bool,
}

impl ViewSession {
    /// Create a session for `row_count` rows with an initial revealed
    /// watermark (clamped to `row_count`).
    #[must_use]
    pub fn new(row_count: usize, initial_revealed: usize) -> Self {
        Self {
            row_count,
            frontier: 0,
            revealed: initial_revealed.min(row_count),
            selected: None,
            disposed: false,
        }
    }

    /// Number of rows in the dataset.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Furthest index the user has ever scrolled to. Never decreases.
    #[must_use]
    pub fn frontier(&self) -> usize {
        self.frontier
    }

    /// Current revealed-row watermark.
    #[must_use]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Whether the row at `index` is considered loaded (vs. skeleton).
    #[must_use]
    pub fn is_revealed(&self, index: usize) -> bool {
        index < self.revealed
    }

    /// The expanded row, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether `index` is the expanded row.
    #[must_use]
    pub fn is_expanded(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    /// Toggle selection of a row: selecting the already-selected row clears
    /// it, anything else replaces the previous selection. O(1).
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count()`.
    pub fn toggle(&mut self, index: usize) {
        assert!(
            index < self.row_count,
            "row index {index} out of range for {} rows",
            self.row_count
        );
        if self.selected == Some(index) {
            self.selected = None;
        } else {
            self.selected = Some(index);
        }
    }

    /// Indices that must render regardless of the visible range.
    pub fn forced_includes(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.into_iter()
    }

    /// Advance the scroll frontier. Monotonic: a lower `end` is ignored.
    /// Crate-private so the range extractor stays the sole write path.
    pub(crate) fn note_frontier(&mut self, end: usize) {
        debug_assert!(end < self.row_count);
        if end > self.frontier {
            self.frontier = end;
        }
    }

    /// Raise the revealed watermark. Crate-private write path for the
    /// frontier controller; clamped to the row count, never lowered.
    pub(crate) fn set_revealed(&mut self, revealed: usize) {
        debug_assert!(revealed >= self.revealed);
        self.revealed = revealed.min(self.row_count);
    }

    /// Mark the session as torn down; pending timer callbacks become no-ops.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    /// Whether the owning view has been torn down.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
