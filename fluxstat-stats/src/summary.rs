//! Summary Statistics
//!
//! Derives the final metrics from a fully merged accumulator. Derivation
//! happens exactly once per run; summaries are never merged.
//!
//! Variance is the POPULATION variance (`sum_sq / count - mean^2`, divisor
//! `count`), not the sample variance.

use crate::accumulator::Accumulator;
use serde::{Deserialize, Serialize};

/// Final metrics derived from an accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of values that contributed
    pub count: u64,
    /// Smallest value (`+inf` when empty)
    pub min: f64,
    /// Largest value (`-inf` when empty)
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population variance
    pub variance: f64,
    /// Square root of the variance
    pub std_dev: f64,
}

/// Derive mean, population variance and standard deviation.
///
/// An empty accumulator yields NaN for mean, variance and stddev, and keeps
/// the infinite min/max identities.
pub fn compute_summary(acc: &Accumulator) -> SummaryStatistics {
    if acc.is_empty() {
        return SummaryStatistics {
            count: 0,
            min: acc.min,
            max: acc.max,
            mean: f64::NAN,
            variance: f64::NAN,
            std_dev: f64::NAN,
        };
    }

    let n = acc.count as f64;
    let mean = acc.sum / n;
    let raw = acc.sum_sq / n - mean * mean;
    // Cancellation can push a zero variance slightly negative; NaN passes through
    let variance = if raw < 0.0 { 0.0 } else { raw };

    SummaryStatistics {
        count: acc.count,
        min: acc.min,
        max: acc.max,
        mean,
        variance,
        std_dev: variance.sqrt(),
    }
}

impl From<Accumulator> for SummaryStatistics {
    fn from(acc: Accumulator) -> Self {
        compute_summary(&acc)
    }
}
