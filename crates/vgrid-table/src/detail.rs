#![forbid(unsafe_code)]

//! Detail panel for the expanded row.
//!
//! Simulates asynchronous enrichment: on open, a one-shot deadline is
//! scheduled; once it passes, the panel's content is "ready" and the row's
//! rendered height grows, which obligates a re-measurement (the table view
//! flags the row in its next render plan — skipping it would desync the
//! offset math for every later row).
//!
//! The deadline is owned by the panel and dies with it: collapsing the row
//! or tearing the view down drops the panel, and with it the timer.

use std::time::{Duration, Instant};

/// Simulated fetch latency before the panel's content is ready.
pub const DETAIL_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Content state of a detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    /// Enrichment still in flight; the host renders a loading placeholder.
    Pending,
    /// Content arrived; the panel renders at full height.
    Ready,
}

/// Stateful sub-view mounted beneath the expanded row's cells.
#[derive(Debug, Clone)]
pub struct DetailPanel {
    row: usize,
    /// Reveal deadline; `None` once fired.
    due: Option<Instant>,
}

impl DetailPanel {
    /// Open a panel for `row`, scheduling the reveal `delay` from `now`.
    #[must_use]
    pub fn open_at(row: usize, now: Instant, delay: Duration) -> Self {
        Self {
            row,
            due: Some(now + delay),
        }
    }

    /// The row this panel belongs to.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Current content state.
    #[must_use]
    pub fn status(&self) -> DetailStatus {
        if self.due.is_some() {
            DetailStatus::Pending
        } else {
            DetailStatus::Ready
        }
    }

    /// Fire the reveal if its deadline has passed. Returns `true` exactly
    /// once, on the tick where content becomes ready.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Time remaining until the reveal, if one is still scheduled.
    #[must_use]
    pub fn time_until_reveal(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }
}
