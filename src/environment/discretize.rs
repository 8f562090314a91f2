//! Binning of continuous values into bounded bucket indices
//!
//! The first and last buckets are unbounded overflow buckets; the remaining
//! `bin_count - 2` buckets split `[left, right)` into equal widths.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Map `value` into a bucket index in `[0, bin_count)`.
///
/// Values below `left` land in bucket 0, values at or above `right` land in
/// bucket `bin_count - 1`. Callers go through [`Bins::digitize`], whose
/// constructor guarantees `bin_count >= 3` and `left < right`.
pub(crate) fn digitize(left: f64, right: f64, bin_count: usize, value: f64) -> usize {
    debug_assert!(bin_count >= 3, "digitize needs at least one interior bucket");
    if value < left {
        return 0;
    }
    if value >= right {
        return bin_count - 1;
    }
    let width = (right - left) / (bin_count - 2) as f64;
    let interior = ((value - left) / width).floor() as usize;
    (interior + 1).min(bin_count - 1)
}

/// Mixed-radix composition of per-axis indices, most significant first.
///
/// `compose_index(&[a, b, c], &[_, nb, nc]) == (a * nb + b) * nc + c`.
pub fn compose_index(indices: &[usize], sizes: &[usize]) -> usize {
    debug_assert_eq!(indices.len(), sizes.len());
    indices
        .iter()
        .zip(sizes)
        .fold(0, |acc, (&index, &size)| acc * size + index)
}

/// Bounds and bucket count for one continuous axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bins {
    pub left: f64,
    pub right: f64,
    pub bin_count: usize,
}

impl Bins {
    /// Create a validated axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when `bin_count < 3` or when
    /// `left` is not strictly below `right`.
    pub fn new(left: f64, right: f64, bin_count: usize) -> Result<Self> {
        if bin_count < 3 {
            return Err(Error::InvalidConfiguration {
                message: format!("bin count must be at least 3, got {bin_count}"),
            });
        }
        if left.is_nan() || right.is_nan() || left >= right {
            return Err(Error::InvalidConfiguration {
                message: format!("bin bounds must satisfy left < right, got [{left}, {right}]"),
            });
        }
        Ok(Self {
            left,
            right,
            bin_count,
        })
    }

    pub fn digitize(&self, value: f64) -> usize {
        digitize(self.left, self.right, self.bin_count, value)
    }
}
