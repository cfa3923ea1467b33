#![forbid(unsafe_code)]

//! Row source contract: ordered, indexable rows with named column
//! accessors.
//!
//! The engine consumes rows through this seam and never owns the data. Row
//! identity (the key) stays stable across sorts; windowing math uses plain
//! indices into the current order.

/// Stable row identity, used for render keying across sorts.
pub type RowKey = u64;

/// A column definition: identity, accessor, display width, sortability.
#[derive(Debug, Clone)]
pub struct Column<R> {
    /// Stable column identifier.
    pub id: &'static str,
    /// Header label.
    pub title: &'static str,
    /// Preferred display width in pixels.
    pub width: u16,
    /// Whether collaborators may sort by this column.
    pub sortable: bool,
    /// Extracts this column's cell value from a row.
    pub accessor: fn(&R) -> String,
}

/// An ordered, indexable sequence of row records.
pub trait RowSource {
    /// The row record type. Immutable snapshots; the rendering core never
    /// mutates them.
    type Row;

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// The row at `index`.
    ///
    /// Implementations must fail fast on out-of-range indices; a silent
    /// clamp would hide a windowing desync.
    fn row_at(&self, index: usize) -> &Self::Row;

    /// Stable identity of the row at `index`.
    fn row_key(&self, index: usize) -> RowKey;

    /// Ordered column definitions.
    fn columns(&self) -> &[Column<Self::Row>];

    /// Cell value for `(index, column)` via the column's accessor.
    fn cell(&self, index: usize, column: usize) -> String {
        (self.columns()[column].accessor)(self.row_at(index))
    }
}

/// A row source backed by an owned `Vec`.
#[derive(Debug, Clone)]
pub struct VecSource<R> {
    rows: Vec<R>,
    key: fn(&R) -> RowKey,
    columns: Vec<Column<R>>,
}

impl<R> VecSource<R> {
    /// Create a source from rows, a key extractor, and column definitions.
    #[must_use]
    pub fn new(rows: Vec<R>, key: fn(&R) -> RowKey, columns: Vec<Column<R>>) -> Self {
        Self { rows, key, columns }
    }

    /// The underlying rows, in current order.
    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Reorder rows by a precomputed permutation (see [`sort_permutation`]).
    ///
    /// # Panics
    ///
    /// Panics if `permutation` is not a permutation of `0..row_count()`.
    pub fn apply_permutation(&mut self, permutation: &[usize]) {
        assert_eq!(permutation.len(), self.rows.len());
        let mut reordered = Vec::with_capacity(self.rows.len());
        let mut taken = vec![false; self.rows.len()];
        for &i in permutation {
            assert!(!taken[i], "index {i} repeated in permutation");
            taken[i] = true;
        }
        // Drain in permutation order without cloning rows.
        let mut slots: Vec<Option<R>> = self.rows.drain(..).map(Some).collect();
        for &i in permutation {
            reordered.push(slots[i].take().expect("permutation verified above"));
        }
        self.rows = reordered;
    }
}

impl<R> RowSource for VecSource<R> {
    type Row = R;

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn row_at(&self, index: usize) -> &R {
        &self.rows[index]
    }

    fn row_key(&self, index: usize) -> RowKey {
        (self.key)(&self.rows[index])
    }

    fn columns(&self) -> &[Column<R>] {
        &self.columns
    }
}

/// Compute a deterministic sort permutation over a source's current order.
///
/// Rows comparing equal keep their original relative order (stable
/// tie-break by original index), so repeated sorts are reproducible without
/// the engine knowing the comparator.
///
/// # Panics
///
/// Panics if `column` is out of range or not sortable.
#[must_use]
pub fn sort_permutation<S: RowSource>(source: &S, column: usize, descending: bool) -> Vec<usize> {
    let col = &source.columns()[column];
    assert!(col.sortable, "column {} is not sortable", col.id);

    let keys: Vec<String> = (0..source.row_count())
        .map(|i| (col.accessor)(source.row_at(i)))
        .collect();
    let mut order: Vec<usize> = (0..source.row_count()).collect();
    // Stable sort: equal keys retain ascending original-index order, in
    // both directions.
    if descending {
        order.sort_by(|&a, &b| keys[b].cmp(&keys[a]));
    } else {
        order.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        name: &'static str,
        qty: u32,
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column {
                id: "name",
                title: "Name",
                width: 200,
                sortable: true,
                accessor: |r| r.name.to_string(),
            },
            Column {
                id: "qty",
                title: "Qty",
                width: 80,
                sortable: false,
                accessor: |r| format!("{:06}", r.qty),
            },
        ]
    }

    fn source() -> VecSource<Item> {
        VecSource::new(
            vec![
                Item { id: 10, name: "pear", qty: 4 },
                Item { id: 11, name: "apple", qty: 9 },
                Item { id: 12, name: "apple", qty: 1 },
                Item { id: 13, name: "fig", qty: 7 },
            ],
            |r| r.id,
            columns(),
        )
    }

    #[test]
    fn cells_go_through_accessors() {
        let src = source();
        assert_eq!(src.cell(0, 0), "pear");
        assert_eq!(src.cell(3, 1), "000007");
        assert_eq!(src.row_key(2), 12);
    }

    #[test]
    fn sort_is_stable_on_ties() {
        let src = source();
        let perm = sort_permutation(&src, 0, false);
        // Two "apple" rows keep original order (index 1 before 2).
        assert_eq!(perm, vec![1, 2, 3, 0]);
    }

    #[test]
    fn descending_sort_keeps_tie_order() {
        let src = source();
        let perm = sort_permutation(&src, 0, true);
        assert_eq!(perm, vec![0, 3, 1, 2]);
    }

    #[test]
    fn apply_permutation_reorders_but_keys_follow() {
        let mut src = source();
        let perm = sort_permutation(&src, 0, false);
        src.apply_permutation(&perm);
        assert_eq!(src.cell(0, 0), "apple");
        assert_eq!(src.row_key(0), 11);
        assert_eq!(src.row_key(3), 10);
    }

    #[test]
    #[should_panic(expected = "not sortable")]
    fn sorting_unsortable_column_panics() {
        let src = source();
        let _ = sort_permutation(&src, 1, false);
    }
}
