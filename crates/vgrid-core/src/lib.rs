#![forbid(unsafe_code)]

//! Headless windowed-rendering engine for large tabular datasets.
//!
//! Decides, for a scrollable viewport over tens of thousands of rows, which
//! row indices must exist in the render output and at what absolute
//! vertical offsets — amortized O(window size) per frame over an O(n)
//! dataset — while tracking dynamically measured row heights, a forced
//! include set (the expanded row), and a monotonically advancing load
//! frontier with debounced progressive reveal.
//!
//! # Components
//!
//! - [`SizeModel`] — estimated/measured row heights with Fenwick-backed
//!   prefix-sum offsets.
//! - [`visible_range`] — scroll position → contiguous visible index range
//!   with overscan.
//! - [`extract`] — union with forced includes, producing the render set and
//!   advancing the scroll frontier.
//! - [`ViewSession`] — explicit session state (frontier, watermark,
//!   selection, disposal).
//! - [`FrontierController`] — debounced watermark advancement.
//!
//! The engine is UI-agnostic and does no I/O. A host layer supplies the
//! viewport (scroll offset, height), row data, and post-layout height
//! measurements; see the `vgrid-table` crate.

mod fenwick;
mod frontier;
mod heights;
mod range;
mod session;
mod window;

pub use fenwick::FenwickTree;
pub use frontier::{FrontierController, LOAD_DEBOUNCE, RECORD_LOAD_INCREMENT};
pub use heights::{DEFAULT_ROW_HEIGHT, SizeModel};
pub use range::{RenderSet, extract};
pub use session::ViewSession;
pub use window::{VisibleRange, visible_range};
