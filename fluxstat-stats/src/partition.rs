//! Partitioning
//!
//! Splits `[0, n)` into exactly `k` contiguous ranges of near-equal length.
//! The first `n % k` ranges carry one extra element, so every range has
//! length `floor(n / k)` or `ceil(n / k)` and trailing ranges are the ones
//! left empty when `n < k`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Half-open index range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive start index
    pub start: usize,
    /// Exclusive end index
    pub end: usize,
}

impl Range {
    /// Create a range. `start >= end` is a legal, empty range.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of indices covered (0 for degenerate ranges)
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no indices
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Errors for malformed partition requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// No tasks requested
    #[error("Task count must be at least 1, got 0")]
    ZeroTasks,
}

/// Split `[0, n)` into exactly `k` contiguous, non-overlapping ranges.
///
/// Returns [`PartitionError::ZeroTasks`] when `k == 0`; a zero task count is
/// a configuration error and must stop the run before anything is dispatched.
pub fn partition(n: usize, k: usize) -> Result<Vec<Range>, PartitionError> {
    if k == 0 {
        return Err(PartitionError::ZeroTasks);
    }

    let base = n / k;
    let remainder = n % k;

    let ranges: Vec<Range> = (0..k)
        .map(|i| {
            let start = i * base + i.min(remainder);
            let len = base + usize::from(i < remainder);
            Range::new(start, start + len)
        })
        .collect();

    tracing::debug!(n, k, base, remainder, "partitioned input");
    Ok(ranges)
}
