//! Topological surprise (S1): coherent entities far from the corpus centroid.
//!
//! The centroid is the mean of the raw vectors. Distance is `1 - cos` between
//! an entity and the centroid, scaled by the largest such distance so the
//! farthest entity scores its full coherence.

use rayon::prelude::*;

use crate::error::{ShimmerError, ShimmerResult};
use crate::similarity::normalize;

const MIN_MAX_DISTANCE: f64 = 1e-12;

/// S1 for each vector, in input order.
///
/// # Errors
///
/// - `EmptyCorpus` for no vectors
/// - `LengthMismatch` if `coherence` differs in length from `vectors`
/// - `DimensionMismatch` for ragged rows
pub fn topological_surprise<V: AsRef<[f64]> + Sync>(
    vectors: &[V],
    coherence: &[f64],
) -> ShimmerResult<Vec<f64>> {
    let first = vectors.first().ok_or(ShimmerError::EmptyCorpus)?;
    ShimmerError::check_len("coherence", vectors.len(), coherence.len())?;
    let dimension = first.as_ref().len();

    let mut centroid = vec![0.0; dimension];
    for (row, v) in vectors.iter().enumerate() {
        let v = v.as_ref();
        if v.len() != dimension {
            return Err(ShimmerError::DimensionMismatch {
                row,
                expected: dimension,
                actual: v.len(),
            });
        }
        for (c, x) in centroid.iter_mut().zip(v) {
            *c += x;
        }
    }
    let centroid = normalize(&centroid);

    let distances: Vec<f64> = vectors
        .par_iter()
        .map(|v| {
            let unit = normalize(v.as_ref());
            1.0 - unit.iter().zip(&centroid).map(|(a, b)| a * b).sum::<f64>()
        })
        .collect();
    let max_distance = distances
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(MIN_MAX_DISTANCE);

    Ok(distances
        .iter()
        .zip(coherence)
        .map(|(d, c)| c * d / max_distance)
        .collect())
}
