#![forbid(unsafe_code)]

//! Size model: per-row estimated and measured heights.
//!
//! Each row starts with a constant estimated height and switches to a
//! measured height the first time the render surface reports one. Measured
//! heights are sticky: an estimate never overwrites a measurement, and a
//! measurement is only discarded through [`SizeModel::invalidate`] (content
//! change inside an expanded row).
//!
//! Offsets are prefix sums over the heights, held in a Fenwick tree so a
//! point update is O(log n) rather than an O(n) offset rebuild.
//!
//! Recording a height never triggers work synchronously; it bumps a change
//! epoch that consumers compare on their next frame, which keeps the
//! measure → re-render → measure loop from re-entering layout.

use crate::fenwick::FenwickTree;

/// Default estimated row height in pixels.
pub const DEFAULT_ROW_HEIGHT: u32 = 33;

/// Tracks estimated/measured heights for a fixed number of rows.
#[derive(Debug, Clone)]
pub struct SizeModel {
    tree: FenwickTree,
    /// Measurement stamp per row; `None` means the row is still estimated.
    measured_at: Vec<Option<u64>>,
    default_height: u32,
    /// Monotonic stamp handed out per measurement.
    clock: u64,
    /// Bumped whenever any height actually changes.
    epoch: u64,
}

impl SizeModel {
    /// Create a model for `row_count` rows, all at the estimated height.
    ///
    /// A zero `default_height` is clamped to 1 so offsets stay strictly
    /// increasing.
    #[must_use]
    pub fn new(row_count: usize, default_height: u32) -> Self {
        let default_height = default_height.max(1);
        Self {
            tree: FenwickTree::from_values(&vec![u64::from(default_height); row_count]),
            measured_at: vec![None; row_count],
            default_height,
            clock: 0,
            epoch: 0,
        }
    }

    /// Number of rows tracked.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tree.len()
    }

    /// The constant estimated height for rows never measured.
    #[must_use]
    pub fn estimate(&self) -> u32 {
        self.default_height
    }

    /// Current height of a row (measured if available, else estimated).
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count()`.
    #[must_use]
    pub fn height(&self, index: usize) -> u32 {
        self.assert_index(index);
        self.tree.get(index) as u32
    }

    /// Whether the row has a sticky measured height.
    #[must_use]
    pub fn is_measured(&self, index: usize) -> bool {
        self.assert_index(index);
        self.measured_at[index].is_some()
    }

    /// Stamp of the row's last measurement, if any.
    #[must_use]
    pub fn measured_at(&self, index: usize) -> Option<u64> {
        self.assert_index(index);
        self.measured_at[index]
    }

    /// Record a measured height for a row.
    ///
    /// Zero heights clamp to the estimate rather than poisoning the offsets
    /// with a degenerate entry. Returns `true` if the stored height actually
    /// changed; an equal re-measurement is a no-op that does not bump the
    /// epoch, which terminates the measure/re-render fixed point.
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count()`.
    pub fn record(&mut self, index: usize, height: u32) -> bool {
        self.assert_index(index);
        let height = if height == 0 {
            self.default_height
        } else {
            height
        };
        self.clock += 1;
        self.measured_at[index] = Some(self.clock);
        let changed = self.tree.get(index) != u64::from(height);
        if changed {
            self.tree.set(index, u64::from(height));
            self.epoch += 1;
            #[cfg(feature = "tracing")]
            tracing::trace!(index, height, epoch = self.epoch, "height recorded");
        }
        changed
    }

    /// Discard a row's measurement, reverting it to the estimate.
    ///
    /// # Panics
    ///
    /// Panics if `index >= row_count()`.
    pub fn invalidate(&mut self, index: usize) {
        self.assert_index(index);
        if self.measured_at[index].take().is_some()
            && self.tree.get(index) != u64::from(self.default_height)
        {
            self.tree.set(index, u64::from(self.default_height));
            self.epoch += 1;
        }
    }

    /// Absolute top offset of a row: the sum of heights of rows `[0, index)`.
    ///
    /// `index == row_count()` is allowed and returns the total height.
    ///
    /// # Panics
    ///
    /// Panics if `index > row_count()`.
    #[must_use]
    pub fn offset(&self, index: usize) -> u64 {
        assert!(
            index <= self.row_count(),
            "row index {index} out of range for {} rows",
            self.row_count()
        );
        self.tree.prefix(index)
    }

    /// Total scroll height of all rows.
    #[must_use]
    pub fn total_height(&self) -> u64 {
        self.tree.total()
    }

    /// Index of the row occupying pixel `offset`, clamped to the last row
    /// for offsets at or past the end.
    #[must_use]
    pub fn row_at(&self, offset: u64) -> usize {
        let n = self.row_count();
        if n == 0 {
            return 0;
        }
        self.tree.rank(offset).min(n - 1)
    }

    /// Change epoch; bumped whenever any height changes. Consumers compare
    /// epochs across frames instead of reacting inside the measurement
    /// callback.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn assert_index(&self, index: usize) {
        assert!(
            index < self.row_count(),
            "row index {index} out of range for {} rows",
            self.row_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_until_measured() {
        let sizes = SizeModel::new(10, 33);
        assert_eq!(sizes.height(0), 33);
        assert_eq!(sizes.height(9), 33);
        assert!(!sizes.is_measured(4));
        assert_eq!(sizes.total_height(), 330);
    }

    #[test]
    fn record_updates_offsets() {
        let mut sizes = SizeModel::new(5, 33);
        assert!(sizes.record(2, 80));
        assert_eq!(sizes.height(2), 80);
        assert!(sizes.is_measured(2));
        assert_eq!(sizes.offset(2), 66);
        assert_eq!(sizes.offset(3), 146);
        assert_eq!(sizes.total_height(), 33 * 4 + 80);
    }

    #[test]
    fn equal_remeasurement_is_a_noop() {
        let mut sizes = SizeModel::new(5, 33);
        assert!(sizes.record(1, 40));
        let epoch = sizes.epoch();
        assert!(!sizes.record(1, 40));
        assert_eq!(sizes.epoch(), epoch);
    }

    #[test]
    fn zero_height_clamps_to_estimate() {
        let mut sizes = SizeModel::new(3, 33);
        assert!(!sizes.record(1, 0));
        assert_eq!(sizes.height(1), 33);
        // Still counts as measured: the surface did report a layout.
        assert!(sizes.is_measured(1));
    }

    #[test]
    fn invalidate_reverts_to_estimate() {
        let mut sizes = SizeModel::new(3, 33);
        sizes.record(1, 120);
        let epoch = sizes.epoch();
        sizes.invalidate(1);
        assert_eq!(sizes.height(1), 33);
        assert!(!sizes.is_measured(1));
        assert!(sizes.epoch() > epoch);
        // Invalidating an estimated row changes nothing.
        let epoch = sizes.epoch();
        sizes.invalidate(1);
        assert_eq!(sizes.epoch(), epoch);
    }

    #[test]
    fn measurement_stamps_are_monotonic() {
        let mut sizes = SizeModel::new(3, 33);
        sizes.record(0, 10);
        sizes.record(2, 20);
        let a = sizes.measured_at(0).unwrap();
        let b = sizes.measured_at(2).unwrap();
        assert!(b > a);
        assert_eq!(sizes.measured_at(1), None);
    }

    #[test]
    fn row_at_clamps_past_end() {
        let sizes = SizeModel::new(4, 10);
        assert_eq!(sizes.row_at(0), 0);
        assert_eq!(sizes.row_at(39), 3);
        assert_eq!(sizes.row_at(40), 3);
        assert_eq!(sizes.row_at(u64::MAX), 3);
    }

    #[test]
    fn offset_consistency() {
        let mut sizes = SizeModel::new(100, 33);
        sizes.record(10, 90);
        sizes.record(50, 1);
        for i in 0..100 {
            assert_eq!(
                sizes.offset(i + 1) - sizes.offset(i),
                u64::from(sizes.height(i))
            );
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn record_out_of_range_panics() {
        let mut sizes = SizeModel::new(3, 33);
        sizes.record(3, 50);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn height_out_of_range_panics() {
        let sizes = SizeModel::new(3, 33);
        let _ = sizes.height(3);
    }
}
