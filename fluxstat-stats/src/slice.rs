//! Slice Worker
//!
//! The per-range computation run by every execution strategy.

use crate::accumulator::Accumulator;
use crate::partition::Range;

/// Compute the accumulator for `data[range.start..range.end]`.
///
/// Degenerate ranges return the identity without touching `data`. Reads are
/// confined to the range, so any number of workers may run concurrently over
/// disjoint ranges of the same slice.
///
/// # Panics
/// Panics if a non-empty range ends past `data.len()`.
pub fn compute_slice(data: &[f64], range: Range) -> Accumulator {
    if range.is_empty() {
        return Accumulator::identity();
    }
    data[range.start..range.end].iter().copied().collect()
}
