#![warn(missing_docs)]
//! FluxStat Statistical Core
//!
//! Pure building blocks of the parallel reduction:
//! - `Accumulator` sufficient statistics with an associative, commutative merge
//! - `compute_slice` worker over a half-open index range
//! - `partition` of `[0, n)` into exactly `k` near-equal ranges
//! - `compute_summary` deriving mean, population variance and stddev

mod accumulator;
mod partition;
mod slice;
mod summary;

pub use accumulator::Accumulator;
pub use partition::{PartitionError, Range, partition};
pub use slice::compute_slice;
pub use summary::{SummaryStatistics, compute_summary};

/// Fold a sequence of partial results into one accumulator
pub fn merge_all<I>(partials: I) -> Accumulator
where
    I: IntoIterator<Item = Accumulator>,
{
    partials.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_then_merge_matches_full_scan() {
        let data: Vec<f64> = (0..1000).map(|i| (i % 37) as f64 - 18.0).collect();
        let full = compute_slice(&data, Range::new(0, data.len()));

        for k in 1..=16 {
            let ranges = partition(data.len(), k).unwrap();
            let merged = merge_all(ranges.iter().map(|r| compute_slice(&data, *r)));
            assert_eq!(merged, full, "k={k}");
        }
    }

    #[test]
    fn test_merge_all_empty() {
        assert_eq!(merge_all(Vec::new()), Accumulator::identity());
    }
}
