#![forbid(unsafe_code)]

//! Table view orchestration: drives the windowing engine against a row
//! source and produces render plans for a host surface.
//!
//! The host forwards scroll/resize/click events and post-layout height
//! measurements in; each [`render_plan_at`](TableView::render_plan_at)
//! call hands back the exact set of rows that must exist, each with its
//! absolute offset, skeleton/loaded flag, expansion flag, and whether its
//! height must be (re-)measured after the next layout commit.
//!
//! All mutation happens on discrete entry points; reactions (a measurement
//! changing offsets, the frontier moving the watermark, the detail panel
//! revealing) are picked up by the next plan or tick, never synchronously
//! inside the callback that caused them.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, debug_span};

use vgrid_core::{
    FrontierController, LOAD_DEBOUNCE, RECORD_LOAD_INCREMENT, SizeModel, ViewSession, extract,
    visible_range,
};

use crate::detail::{DETAIL_REVEAL_DELAY, DetailPanel, DetailStatus};
use crate::source::{RowKey, RowSource};

/// Tuning knobs for a table view.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Estimated height for rows never measured, in pixels.
    pub default_row_height: u32,
    /// Rows rendered beyond the visible range on each side.
    pub overscan: usize,
    /// Rows revealed per watermark advance.
    pub load_increment: usize,
    /// Debounce window before a watermark advance.
    pub load_debounce: Duration,
    /// Simulated fetch latency for the detail panel.
    pub detail_delay: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_row_height: vgrid_core::DEFAULT_ROW_HEIGHT,
            overscan: 10,
            load_increment: RECORD_LOAD_INCREMENT,
            load_debounce: LOAD_DEBOUNCE,
            detail_delay: DETAIL_REVEAL_DELAY,
        }
    }
}

/// The scrollable element the view is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Current scroll offset in pixels.
    pub scroll_top: u64,
    /// Viewport height in pixels.
    pub height: u32,
}

/// One row the host must render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSlot {
    /// Index into the row source's current order.
    pub index: usize,
    /// Stable identity; the host's render key.
    pub key: RowKey,
    /// Absolute top offset in pixels.
    pub top: u64,
    /// Current (measured or estimated) height in pixels.
    pub height: u32,
    /// Whether this row renders with its detail panel mounted.
    pub expanded: bool,
    /// `false` renders skeleton placeholder content.
    pub loaded: bool,
    /// The host must report this row's height after layout commit.
    pub needs_measure: bool,
    /// Detail panel state, present only on the expanded row.
    pub detail: Option<DetailStatus>,
}

/// Output of one render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    /// Total scroll height of the dataset.
    pub total_height: u64,
    /// Rows to render, ascending by index.
    pub rows: Vec<RowSlot>,
    /// Keys rendered last pass but absent now; the host destroys these and
    /// the view has already released any timers they owned.
    pub retired: Vec<RowKey>,
}

/// Windowed table view over a row source.
pub struct TableView<S: RowSource> {
    source: S,
    sizes: SizeModel,
    session: ViewSession,
    frontier: FrontierController,
    detail: Option<DetailPanel>,
    viewport: Option<Viewport>,
    overscan: usize,
    detail_delay: Duration,
    /// Rendered-row handles from the previous plan, keyed by stable
    /// identity so rows are destroyed/recreated predictably across sorts.
    mounted: HashMap<RowKey, usize>,
    /// Rows whose content changed since their last reported measurement.
    remeasure: Vec<usize>,
}

impl<S: RowSource> TableView<S> {
    /// Create a view over `source`. Windowing stays disabled (plans are
    /// empty) until a viewport is attached.
    #[must_use]
    pub fn new(source: S, config: TableConfig) -> Self {
        let n = source.row_count();
        Self {
            sizes: SizeModel::new(n, config.default_row_height),
            session: ViewSession::new(n, config.load_increment),
            frontier: FrontierController::new()
                .with_increment(config.load_increment)
                .with_debounce(config.load_debounce),
            detail: None,
            viewport: None,
            overscan: config.overscan,
            detail_delay: config.detail_delay,
            mounted: HashMap::new(),
            remeasure: Vec::new(),
            source,
        }
    }

    /// The underlying row source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Session state (frontier, watermark, selection).
    #[must_use]
    pub fn session(&self) -> &ViewSession {
        &self.session
    }

    /// The size model.
    #[must_use]
    pub fn sizes(&self) -> &SizeModel {
        &self.sizes
    }

    /// Change epoch of the size model; a host can compare epochs across
    /// frames to decide whether offsets moved under it.
    #[must_use]
    pub fn size_epoch(&self) -> u64 {
        self.sizes.epoch()
    }

    /// Bind the scrollable element. Scroll position resets to the top on
    /// first attach and is preserved on height-only changes.
    pub fn attach_viewport(&mut self, height: u32) {
        match &mut self.viewport {
            Some(vp) => vp.height = height,
            None => {
                self.viewport = Some(Viewport {
                    scroll_top: 0,
                    height,
                });
            }
        }
    }

    /// Drop the viewport binding; subsequent plans render nothing until a
    /// viewport is attached again.
    pub fn detach_viewport(&mut self) {
        self.viewport = None;
    }

    /// Handle a scroll event. Ignored while no viewport is bound.
    pub fn set_scroll_top(&mut self, scroll_top: u64) {
        if let Some(vp) = &mut self.viewport {
            vp.scroll_top = scroll_top;
        }
    }

    /// Handle a resize event. Ignored while no viewport is bound.
    pub fn set_viewport_height(&mut self, height: u32) {
        if let Some(vp) = &mut self.viewport {
            vp.height = height;
        }
    }

    /// Handle a row click: toggle expansion.
    ///
    /// Collapsing drops the detail panel (cancelling its reveal timer) and
    /// invalidates the row's measurement so it reverts to a collapsed
    /// height on its next layout.
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count`.
    pub fn toggle_row(&mut self, index: usize) {
        let previous = self.session.selected();
        self.session.toggle(index);
        if let Some(prev) = previous {
            // Either `index` itself collapsed or another row lost its
            // expansion to it; in both cases the old panel dies with its row.
            self.detail = None;
            self.sizes.invalidate(prev);
            self.remeasure.retain(|&i| i != prev);
        }
    }

    /// Post-layout measurement hook: the host reports a row's committed
    /// height. The updated offsets are observed by the next plan, never
    /// synchronously here.
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count`.
    pub fn record_row_height(&mut self, index: usize, height: u32) {
        self.sizes.record(index, height);
        self.remeasure.retain(|&i| i != index);
    }

    /// Advance timers. Returns `true` if anything changed and the host
    /// should request a new plan.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.session.is_disposed() {
            return false;
        }
        let mut changed = false;
        let revealed_before = self.session.revealed();
        while self.frontier.tick_at(&mut self.session, now) {
            changed = true;
        }
        // Newly revealed rows swap skeleton placeholders for real content;
        // any height measured off the skeleton is stale.
        for index in revealed_before..self.session.revealed() {
            if self.sizes.is_measured(index) && !self.remeasure.contains(&index) {
                self.remeasure.push(index);
            }
        }
        if let Some(panel) = &mut self.detail
            && panel.tick_at(now)
        {
            // Content arrived: the row grows and must be re-measured, or
            // the offset math desyncs for every row below it.
            let row = panel.row();
            if !self.remeasure.contains(&row) {
                self.remeasure.push(row);
            }
            changed = true;
        }
        changed
    }

    /// Time until the next scheduled timer fires, for the host's poll
    /// timeout. `None` when nothing is pending.
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let advance = self.frontier.time_until_advance(now);
        let reveal = self.detail.as_ref().and_then(|p| p.time_until_reveal(now));
        match (advance, reveal) {
            (Some(a), Some(r)) => Some(a.min(r)),
            (a, r) => a.or(r),
        }
    }

    /// Compute the render plan for the current scroll state.
    pub fn render_plan_at(&mut self, now: Instant) -> RenderPlan {
        let _span = debug_span!(
            "render_plan",
            rows = self.source.row_count(),
            scroll = self.viewport.map(|v| v.scroll_top).unwrap_or(0),
        )
        .entered();

        if self.session.is_disposed() {
            // Torn down: plan nothing and never spawn a fresh panel timer.
            return self.empty_plan();
        }

        let Some(vp) = self.viewport else {
            // Missing viewport: windowing disabled, everything unmounts.
            return self.empty_plan();
        };

        let range = visible_range(&self.sizes, vp.scroll_top, vp.height, self.overscan);
        if range.is_none() {
            return self.empty_plan();
        }
        let forced: Vec<usize> = self.session.forced_includes().collect();
        let set = extract(range, forced, &mut self.session);
        self.frontier.observe_at(&self.session, now);

        // The expanded row is in the set (forced include); mount its panel
        // if it does not have one yet. Mounting changes the row's rendered
        // height, so it needs a fresh measurement.
        if let Some(selected) = self.session.selected()
            && self.detail.is_none()
        {
            self.detail = Some(DetailPanel::open_at(selected, now, self.detail_delay));
            if !self.remeasure.contains(&selected) {
                self.remeasure.push(selected);
            }
        }

        let mut rows = Vec::with_capacity(set.len());
        let mut keys: HashMap<RowKey, usize> = HashMap::with_capacity(set.len());
        for &index in &set {
            let key = self.source.row_key(index);
            let expanded = self.session.is_expanded(index);
            rows.push(RowSlot {
                index,
                key,
                top: self.sizes.offset(index),
                height: self.sizes.height(index),
                expanded,
                loaded: self.session.is_revealed(index),
                needs_measure: !self.sizes.is_measured(index)
                    || self.remeasure.contains(&index),
                detail: if expanded {
                    self.detail.as_ref().map(DetailPanel::status)
                } else {
                    None
                },
            });
            keys.insert(key, index);
        }

        let retired: Vec<RowKey> = self
            .mounted
            .keys()
            .filter(|k| !keys.contains_key(k))
            .copied()
            .collect();
        self.mounted = keys;

        debug!(
            rendered = rows.len(),
            retired = retired.len(),
            frontier = self.session.frontier(),
            revealed = self.session.revealed(),
            "render plan"
        );

        RenderPlan {
            total_height: self.sizes.total_height(),
            rows,
            retired,
        }
    }

    /// Tear the view down: pending timers become no-ops and are released.
    pub fn dispose(&mut self) {
        self.session.dispose();
        self.frontier.cancel();
        self.detail = None;
    }

    fn empty_plan(&mut self) -> RenderPlan {
        let retired: Vec<RowKey> = self.mounted.drain().map(|(k, _)| k).collect();
        // Every rendered row is gone, including the expanded one; its
        // panel's timer must not outlive it.
        self.detail = None;
        RenderPlan {
            total_height: self.sizes.total_height(),
            rows: Vec::new(),
            retired,
        }
    }
}
