//! Sufficient Statistics Accumulator
//!
//! Holds count, sum, sum of squares, min and max for a slice of values.
//! Merging two accumulators is associative and commutative, so partial
//! results can be combined in whatever order worker threads finish.

use serde::{Deserialize, Serialize};

/// Sufficient statistics for a slice of `f64` values
///
/// The empty accumulator ([`Accumulator::identity`]) is the identity element
/// of [`Accumulator::merge`]: zero count and sums, `+inf` min, `-inf` max.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    /// Number of values observed
    pub count: u64,
    /// Sum of values
    pub sum: f64,
    /// Sum of squared values
    pub sum_sq: f64,
    /// Minimum value (`+inf` when empty)
    pub min: f64,
    /// Maximum value (`-inf` when empty)
    pub max: f64,
}

impl Accumulator {
    /// The empty accumulator
    #[inline]
    pub const fn identity() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Accumulator holding exactly one value
    #[inline]
    pub fn of(value: f64) -> Self {
        Self {
            count: 1,
            sum: value,
            sum_sq: value * value,
            min: value,
            max: value,
        }
    }

    /// Combine two partial results
    #[inline]
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            sum: self.sum + other.sum,
            sum_sq: self.sum_sq + other.sum_sq,
            min: nan_min(self.min, other.min),
            max: nan_max(self.max, other.max),
        }
    }

    /// Fold a single value into this accumulator in place.
    ///
    /// Equivalent to `*self = self.merge(Accumulator::of(value))`.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.sum_sq += value * value;
        self.min = nan_min(self.min, value);
        self.max = nan_max(self.max, value);
    }

    /// Whether no values have been observed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

// `f64::min`/`f64::max` drop a NaN operand; a NaN input must poison min/max
#[inline]
fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.min(b) }
}

#[inline]
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() { f64::NAN } else { a.max(b) }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut acc = Self::identity();
        acc.extend(iter);
        acc
    }
}

impl Extend<f64> for Accumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl std::iter::Sum for Accumulator {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::identity(), Self::merge)
    }
}
