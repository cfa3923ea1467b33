#![forbid(unsafe_code)]

//! Fenwick (binary indexed) tree over row heights.
//!
//! Backs the size model's prefix-sum offsets: point updates, prefix sums,
//! and offset-to-index rank queries are all O(log n), so a single row
//! changing height never forces an O(n) rebuild of the offset table.
//!
//! # Invariants
//!
//! 1. `prefix(k)` == sum of the first `k` values.
//! 2. `rank(t)` returns the largest `k` with `prefix(k) <= t`, capped at `len`.
//! 3. `total()` == `prefix(len)`.

/// Fenwick tree storing `u64` values with `u64` prefix sums.
#[derive(Debug, Clone)]
pub struct FenwickTree {
    /// 1-based implicit tree; `tree[0]` is unused padding.
    tree: Vec<u64>,
    len: usize,
}

impl FenwickTree {
    /// Create a tree of `len` zeroed values.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
            len,
        }
    }

    /// Build a tree from a slice of values in O(n).
    #[must_use]
    pub fn from_values(values: &[u64]) -> Self {
        let len = values.len();
        let mut tree = vec![0u64; len + 1];
        for (i, &v) in values.iter().enumerate() {
            let pos = i + 1;
            tree[pos] += v;
            let parent = pos + (pos & pos.wrapping_neg());
            if parent <= len {
                let carry = tree[pos];
                tree[parent] += carry;
            }
        }
        Self { tree, len }
    }

    /// Number of values tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree tracks no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sum of the first `count` values. O(log n).
    ///
    /// # Panics
    ///
    /// Panics if `count > len`.
    #[must_use]
    pub fn prefix(&self, count: usize) -> u64 {
        assert!(count <= self.len, "prefix count {count} out of range");
        let mut pos = count;
        let mut sum = 0u64;
        while pos > 0 {
            sum += self.tree[pos];
            pos &= pos - 1;
        }
        sum
    }

    /// Sum of all values. O(log n).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.prefix(self.len)
    }

    /// Individual value at `idx`. O(log n).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    #[must_use]
    pub fn get(&self, idx: usize) -> u64 {
        assert!(idx < self.len, "index {idx} out of range");
        self.prefix(idx + 1) - self.prefix(idx)
    }

    /// Set the value at `idx`. O(log n).
    ///
    /// # Panics
    ///
    /// Panics if `idx >= len`.
    pub fn set(&mut self, idx: usize, value: u64) {
        let old = self.get(idx);
        if value == old {
            return;
        }
        let mut pos = idx + 1;
        if value >= old {
            let delta = value - old;
            while pos <= self.len {
                self.tree[pos] += delta;
                pos += pos & pos.wrapping_neg();
            }
        } else {
            let delta = old - value;
            while pos <= self.len {
                self.tree[pos] -= delta;
                pos += pos & pos.wrapping_neg();
            }
        }
    }

    /// Largest `count` such that `prefix(count) <= target`, capped at `len`.
    /// O(log n).
    ///
    /// With strictly positive values this maps a pixel offset to the index
    /// of the row occupying it: offset `t` falls inside row `rank(t)`.
    #[must_use]
    pub fn rank(&self, target: u64) -> usize {
        let mut pos = 0usize;
        let mut remaining = target;
        let mut step = self.len.next_power_of_two();
        while step > 0 {
            let next = pos + step;
            if next <= self.len && self.tree[next] <= remaining {
                remaining -= self.tree[next];
                pos = next;
            }
            step >>= 1;
        }
        pos
    }
}
