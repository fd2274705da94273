//! Coherence peak (S2b): entities noticeably more coherent than a tight
//! neighborhood.
//!
//! `surplus = max(0, c_i - mean_{j in N(i,k)} c_j)`, scaled by the inverse of
//! the mean cosine distance to those neighbors. A degenerate neighborhood
//! (mean distance below 1e-12) scores 0.

use crate::aggregate::{aggregate, aggregate_sets, NeighborStatistic};
use crate::error::{ShimmerError, ShimmerResult};
use crate::similarity::{NeighborSet, SimilarityIndex};

const MIN_MEAN_DISTANCE: f64 = 1e-12;

pub struct CoherencePeak<'a> {
    coherence: &'a [f64],
}

impl<'a> CoherencePeak<'a> {
    pub fn new(coherence: &'a [f64]) -> Self {
        Self { coherence }
    }

    /// S2b for every entity of `index`.
    pub fn score_all(&self, index: &SimilarityIndex, k: usize) -> ShimmerResult<Vec<f64>> {
        ShimmerError::check_len("coherence", index.len(), self.coherence.len())?;
        aggregate(index, k, self)
    }

    /// S2b from neighbor sets already computed (one per entity, at least
    /// `k` neighbors each).
    pub fn score_with_neighbors(&self, sets: &[NeighborSet], k: usize) -> ShimmerResult<Vec<f64>> {
        ShimmerError::check_len("neighbor sets", self.coherence.len(), sets.len())?;
        aggregate_sets(sets, k, self)
    }
}

impl NeighborStatistic for CoherencePeak<'_> {
    type Output = f64;

    fn evaluate(&self, entity: usize, neighbors: &NeighborSet) -> f64 {
        if neighbors.is_empty() {
            return 0.0;
        }
        let mean_coherence = neighbors
            .indices()
            .map(|j| self.coherence[j])
            .sum::<f64>()
            / neighbors.len() as f64;
        let surplus = (self.coherence[entity] - mean_coherence).max(0.0);
        let mean_distance = neighbors.mean_distance();
        if mean_distance < MIN_MEAN_DISTANCE {
            0.0
        } else {
            surplus / mean_distance
        }
    }
}
