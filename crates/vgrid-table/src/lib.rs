#![forbid(unsafe_code)]

//! Table-facing layer for the vgrid windowed-rendering engine.
//!
//! Binds a [`RowSource`] to the headless engine in `vgrid-core` and turns
//! scroll/resize/click events plus post-layout measurements into
//! [`RenderPlan`]s: the exact rows a host surface must render, with
//! absolute offsets, skeleton/loaded flags, expansion state, and
//! re-measurement obligations.

mod detail;
mod source;
mod view;

pub use detail::{DETAIL_REVEAL_DELAY, DetailPanel, DetailStatus};
pub use source::{Column, RowKey, RowSource, VecSource, sort_permutation};
pub use view::{RenderPlan, RowSlot, TableConfig, TableView, Viewport};
