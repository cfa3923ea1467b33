#![forbid(unsafe_code)]

//! Load frontier controller: debounced progressive reveal.
//!
//! A two-state machine (*idle*, *pending-advance*) that chases the scroll
//! frontier with the revealed watermark in fixed increments. Any frontier
//! change re-arms the deadline (debounce, not throttle: only the latest
//! frontier matters). On firing, the watermark advances one increment; if
//! it is still behind the frontier the next advance is due immediately,
//! otherwise the controller returns to idle.
//!
//! Time is injected: hosts call the `*_at(now)` variants with their own
//! clock, so the whole state machine is deterministic under test. No
//! background threads, no ambient timers; the host polls
//! [`time_until_advance`](FrontierController::time_until_advance) to size
//! its event-loop timeout.

use std::time::{Duration, Instant};

use crate::session::ViewSession;

/// Rows revealed per advance step.
pub const RECORD_LOAD_INCREMENT: usize = 100;

/// Debounce window between a frontier change and the first advance.
pub const LOAD_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdvanceState {
    Idle,
    Pending { due: Instant },
}

/// Timer-driven watermark advancer. One per view; cancelled on teardown.
#[derive(Debug, Clone)]
pub struct FrontierController {
    debounce: Duration,
    increment: usize,
    state: AdvanceState,
    last_frontier: usize,
}

impl Default for FrontierController {
    fn default() -> Self {
        Self::new()
    }
}

impl FrontierController {
    /// Create a controller with the default increment and debounce window.
    #[must_use]
    pub fn new() -> Self {
        Self {
            debounce: LOAD_DEBOUNCE,
            increment: RECORD_LOAD_INCREMENT,
            state: AdvanceState::Idle,
            last_frontier: 0,
        }
    }

    /// Set the debounce window.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the per-step reveal increment (clamped to at least 1).
    #[must_use]
    pub fn with_increment(mut self, increment: usize) -> Self {
        self.increment = increment.max(1);
        self
    }

    /// Rows revealed per advance step.
    #[must_use]
    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Whether an advance is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, AdvanceState::Pending { .. })
    }

    /// Notice a (possibly changed) scroll frontier.
    ///
    /// Call after each render pass. Every frontier change that leaves the
    /// watermark behind re-arms the deadline at `now + debounce`, replacing
    /// any pending one.
    pub fn observe_at(&mut self, session: &ViewSession, now: Instant) {
        if session.is_disposed() {
            return;
        }
        if session.frontier() == self.last_frontier {
            return;
        }
        self.last_frontier = session.frontier();
        if session.frontier() > session.revealed() {
            self.state = AdvanceState::Pending {
                due: now + self.debounce,
            };
        }
    }

    /// Fire the advance if its deadline has passed. Returns `true` if the
    /// watermark moved.
    ///
    /// After an advance that still trails the frontier, the next advance is
    /// due immediately; the host's next tick picks it up without another
    /// debounce wait.
    pub fn tick_at(&mut self, session: &mut ViewSession, now: Instant) -> bool {
        if session.is_disposed() {
            self.state = AdvanceState::Idle;
            return false;
        }
        let AdvanceState::Pending { due } = self.state else {
            return false;
        };
        if now < due {
            return false;
        }

        let revealed = (session.revealed() + self.increment).min(session.row_count());
        session.set_revealed(revealed);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            revealed,
            frontier = session.frontier(),
            "revealed watermark advanced"
        );

        if revealed < session.frontier() && revealed < session.row_count() {
            self.state = AdvanceState::Pending { due: now };
        } else {
            self.state = AdvanceState::Idle;
        }
        true
    }

    /// Time remaining until the pending advance fires, if any.
    #[must_use]
    pub fn time_until_advance(&self, now: Instant) -> Option<Duration> {
        match self.state {
            AdvanceState::Idle => None,
            AdvanceState::Pending { due } => Some(due.saturating_duration_since(now)),
        }
    }

    /// Drop any pending advance. Used on view teardown.
    pub fn cancel(&mut self) {
        self.state = AdvanceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_frontier(n: usize, revealed: usize, frontier: usize) -> ViewSession {
        let mut session = ViewSession::new(n, revealed);
        session.note_frontier(frontier);
        session
    }

    #[test]
    fn idle_until_frontier_passes_watermark() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let session = session_with_frontier(1000, 100, 50);
        ctl.observe_at(&session, now);
        assert!(!ctl.is_pending());
        assert_eq!(ctl.time_until_advance(now), None);
    }

    #[test]
    fn advance_fires_after_debounce() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let mut session = session_with_frontier(1000, 100, 150);
        ctl.observe_at(&session, now);
        assert!(ctl.is_pending());

        // Too early: nothing happens.
        assert!(!ctl.tick_at(&mut session, now + Duration::from_millis(499)));
        assert_eq!(session.revealed(), 100);

        assert!(ctl.tick_at(&mut session, now + LOAD_DEBOUNCE));
        assert_eq!(session.revealed(), 200);
        // 200 >= frontier 150: back to idle.
        assert!(!ctl.is_pending());
    }

    #[test]
    fn frontier_changes_rearm_the_deadline() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let mut session = session_with_frontier(10_000, 100, 200);
        ctl.observe_at(&session, now);

        // 100ms later the frontier jumps again; the deadline restarts.
        let t1 = now + Duration::from_millis(100);
        session.note_frontier(5000);
        ctl.observe_at(&session, t1);

        // The original deadline passes without firing.
        assert!(!ctl.tick_at(&mut session, now + LOAD_DEBOUNCE));
        assert_eq!(session.revealed(), 100);

        // The re-armed one fires.
        assert!(ctl.tick_at(&mut session, t1 + LOAD_DEBOUNCE));
        assert_eq!(session.revealed(), 200);
    }

    #[test]
    fn catches_up_in_increments_without_further_debounce() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let mut session = session_with_frontier(10_000, 200, 5000);
        ctl.observe_at(&session, now);

        let mut t = now + LOAD_DEBOUNCE;
        let mut steps = 0;
        while ctl.tick_at(&mut session, t) {
            steps += 1;
            assert!(session.revealed() % RECORD_LOAD_INCREMENT == 0);
            t += Duration::from_millis(1);
            assert!(steps < 100, "controller failed to settle");
        }
        assert_eq!(session.revealed(), 5000);
        assert_eq!(steps, 48);
        assert!(!ctl.is_pending());
    }

    #[test]
    fn watermark_never_exceeds_row_count() {
        let now = Instant::now();
        let mut ctl = FrontierController::new().with_increment(64);
        let mut session = session_with_frontier(130, 100, 129);
        ctl.observe_at(&session, now);
        let mut t = now + LOAD_DEBOUNCE;
        while ctl.tick_at(&mut session, t) {
            t += Duration::from_millis(1);
        }
        assert_eq!(session.revealed(), 130);
    }

    #[test]
    fn unchanged_frontier_does_not_rearm_after_settle() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let mut session = session_with_frontier(1000, 100, 150);
        ctl.observe_at(&session, now);
        assert!(ctl.tick_at(&mut session, now + LOAD_DEBOUNCE));
        // Same frontier observed again: no pending advance.
        ctl.observe_at(&session, now + LOAD_DEBOUNCE);
        assert!(!ctl.is_pending());
    }

    #[test]
    fn tick_after_dispose_is_a_noop() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let mut session = session_with_frontier(1000, 100, 500);
        ctl.observe_at(&session, now);
        session.dispose();
        assert!(!ctl.tick_at(&mut session, now + LOAD_DEBOUNCE));
        assert_eq!(session.revealed(), 100);
        assert!(!ctl.is_pending());
    }

    #[test]
    fn cancel_drops_pending_advance() {
        let now = Instant::now();
        let mut ctl = FrontierController::new();
        let mut session = session_with_frontier(1000, 100, 500);
        ctl.observe_at(&session, now);
        ctl.cancel();
        assert!(!ctl.tick_at(&mut session, now + LOAD_DEBOUNCE));
        assert_eq!(session.revealed(), 100);
    }

    #[test]
    fn custom_increment_and_debounce() {
        let now = Instant::now();
        let mut ctl = FrontierController::new()
            .with_increment(10)
            .with_debounce(Duration::from_millis(50));
        let mut session = session_with_frontier(1000, 100, 115);
        ctl.observe_at(&session, now);
        assert!(!ctl.tick_at(&mut session, now + Duration::from_millis(49)));
        assert!(ctl.tick_at(&mut session, now + Duration::from_millis(50)));
        assert_eq!(session.revealed(), 110);
        // Still behind 115: due immediately.
        assert!(ctl.tick_at(&mut session, now + Duration::from_millis(50)));
        assert_eq!(session.revealed(), 120);
        assert!(!ctl.is_pending());
    }
}
