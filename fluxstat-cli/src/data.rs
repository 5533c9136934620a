//! Input Generation
//!
//! Reproducible uniform input arrays. The array is filled in fixed-size
//! chunks, each with its own RNG derived from the seed and chunk index, so
//! the output depends only on `(size, seed, low, high)` and not on how many
//! threads rayon uses.

use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::sync::Arc;
use thiserror::Error;

/// Values generated per independently-seeded chunk
const CHUNK_LEN: usize = 1 << 16;

/// Invalid generator parameters
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    /// Bounds that do not describe a finite, non-empty interval
    #[error("Value range [{low}, {high}) is empty or not finite")]
    InvalidRange {
        /// Requested lower bound
        low: f64,
        /// Requested upper bound
        high: f64,
    },
}

/// Generate `size` values drawn uniformly from `[low, high)`
pub fn generate_data(
    size: usize,
    seed: u64,
    low: f64,
    high: f64,
) -> Result<Arc<[f64]>, DataError> {
    if !(low < high && (high - low).is_finite()) {
        return Err(DataError::InvalidRange { low, high });
    }

    let dist = Uniform::new(low, high);
    let mut values = vec![0.0f64; size];
    values
        .par_chunks_mut(CHUNK_LEN)
        .enumerate()
        .for_each(|(chunk, out)| {
            let mut rng = StdRng::seed_from_u64(chunk_seed(seed, chunk));
            for v in out.iter_mut() {
                *v = dist.sample(&mut rng);
            }
        });

    tracing::debug!(size, seed, low, high, "generated input");
    Ok(Arc::from(values))
}

// splitmix64 step so neighbouring chunks get unrelated streams
fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    let mut z = seed.wrapping_add((chunk as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
