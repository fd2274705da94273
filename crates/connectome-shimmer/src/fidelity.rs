//! Neighbor-preservation fidelity between an original and a reconstructed
//! corpus.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::error::{ShimmerError, ShimmerResult};
use crate::similarity::SimilarityIndex;

/// Per entity, the fraction of its `k` original neighbors that are still
/// among its `k` neighbors after reconstruction.
///
/// # Errors
///
/// - `LengthMismatch` when the two indexes cover different entity counts
/// - `ConfigurationError` for an unusable `k`
pub fn neighbor_overlap(
    original: &SimilarityIndex,
    reconstructed: &SimilarityIndex,
    k: usize,
) -> ShimmerResult<Vec<f64>> {
    ShimmerError::check_len("reconstructed", original.len(), reconstructed.len())?;
    original.check_k(k)?;
    (0..original.len())
        .into_par_iter()
        .map(|i| {
            let before: HashSet<usize> = original.neighbors(i, k)?.indices().collect();
            let kept = reconstructed
                .neighbors(i, k)?
                .indices()
                .filter(|j| before.contains(j))
                .count();
            Ok(kept as f64 / k as f64)
        })
        .collect()
}

/// Cosine similarity of two vectors; 0 when either has zero norm.
///
/// # Errors
///
/// `DimensionMismatch` when the lengths differ.
pub fn cosine_fidelity(a: &[f64], b: &[f64]) -> ShimmerResult<f64> {
    if a.len() != b.len() {
        return Err(ShimmerError::DimensionMismatch {
            row: 0,
            expected: a.len(),
            actual: b.len(),
        });
    }
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return Ok(0.0);
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>() / (na * nb))
}
