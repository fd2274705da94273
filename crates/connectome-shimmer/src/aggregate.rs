//! Neighbor aggregate primitive.
//!
//! Every neighbor-based metric is a [`NeighborStatistic`]: a function of one
//! entity and its k nearest neighbors. [`aggregate`] evaluates a statistic
//! for every entity in parallel.

use rayon::prelude::*;

use crate::error::{ShimmerError, ShimmerResult};
use crate::similarity::{NeighborSet, SimilarityIndex};

pub trait NeighborStatistic: Sync {
    type Output: Send;

    fn evaluate(&self, entity: usize, neighbors: &NeighborSet) -> Self::Output;
}

/// Evaluate `statistic` over the `k`-neighborhood of every entity.
///
/// Results are in row order.
///
/// # Errors
///
/// `ConfigurationError` when `k` is unusable for this index.
pub fn aggregate<S: NeighborStatistic>(
    index: &SimilarityIndex,
    k: usize,
    statistic: &S,
) -> ShimmerResult<Vec<S::Output>> {
    index.check_k(k)?;
    (0..index.len())
        .into_par_iter()
        .map(|i| {
            let neighbors = index.neighbors(i, k)?;
            Ok(statistic.evaluate(i, &neighbors))
        })
        .collect()
}

/// Evaluate `statistic` over the first `k` neighbors of precomputed sets,
/// one per entity in row order.
///
/// Lets several statistics share one neighbor pass; the sets must hold at
/// least `k` neighbors each.
///
/// # Errors
///
/// `ConfigurationError` when `k == 0` or a set is smaller than `k`.
pub fn aggregate_sets<S: NeighborStatistic>(
    sets: &[NeighborSet],
    k: usize,
    statistic: &S,
) -> ShimmerResult<Vec<S::Output>> {
    if k == 0 {
        return Err(ShimmerError::ConfigurationError(
            "neighborhood size k must be > 0".to_string(),
        ));
    }
    if let Some(short) = sets.iter().find(|set| set.len() < k) {
        return Err(ShimmerError::ConfigurationError(format!(
            "entity {} has {} precomputed neighbors, k={} requested",
            short.entity,
            short.len(),
            k
        )));
    }
    Ok(sets
        .par_iter()
        .map(|set| statistic.evaluate(set.entity, &set.truncated(k)))
        .collect())
}
