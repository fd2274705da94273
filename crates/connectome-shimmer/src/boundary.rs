//! Boundary score (S5): how far an entity's labels diverge from the labels
//! of its geometric neighborhood.
//!
//! For entity `i` with semantic tags `T(i)` and neighbors `N(i, k)`:
//!
//! ```text
//! boundary(i) = 1 - mean_{t in T(i)} |{ j in N(i,k) : t in T(j) }| / k
//! shimmer(i)  = coherence(i) * boundary(i)
//! ```
//!
//! An entity without semantic tags has nothing to overlap and scores
//! `boundary = 1.0`.

use std::collections::HashSet;

use connectome_core::{Corpus, TagClassifier};
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate, aggregate_sets, NeighborStatistic};
use crate::error::{ShimmerError, ShimmerResult};
use crate::similarity::{NeighborSet, SimilarityIndex};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryScore {
    /// In `[0, 1]`.
    pub boundary: f64,
    /// S5, in `[0, coherence]`.
    pub shimmer: f64,
}

pub struct BoundaryScorer<'a> {
    index: &'a SimilarityIndex,
    tags: Vec<HashSet<String>>,
    coherence: Vec<f64>,
    k: usize,
}

impl<'a> BoundaryScorer<'a> {
    /// Score the entities of `corpus`, which must be the corpus `index` was
    /// built from.
    pub fn new(
        index: &'a SimilarityIndex,
        corpus: &Corpus,
        classifier: &TagClassifier,
        k: usize,
    ) -> ShimmerResult<Self> {
        let tags = corpus
            .iter()
            .map(|e| classifier.semantic_set(e.tags()))
            .collect();
        let coherence = corpus.iter().map(|e| e.coherence()).collect();
        Self::from_parts(index, tags, coherence, k)
    }

    /// # Errors
    ///
    /// - `LengthMismatch` when `tags` or `coherence` disagree with the index
    /// - `ConfigurationError` for a coherence outside `[0, 1]` or an unusable `k`
    pub fn from_parts(
        index: &'a SimilarityIndex,
        tags: Vec<HashSet<String>>,
        coherence: Vec<f64>,
        k: usize,
    ) -> ShimmerResult<Self> {
        ShimmerError::check_len("tags", index.len(), tags.len())?;
        ShimmerError::check_len("coherence", index.len(), coherence.len())?;
        if let Some(i) = coherence
            .iter()
            .position(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
        {
            return Err(ShimmerError::ConfigurationError(format!(
                "coherence of entity {} must be in [0, 1], got {}",
                i, coherence[i]
            )));
        }
        index.check_k(k)?;
        Ok(Self {
            index,
            tags,
            coherence,
            k,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn score(&self, i: usize) -> ShimmerResult<BoundaryScore> {
        if self.tags.get(i).is_some_and(HashSet::is_empty) {
            return Ok(self.finish(i, 1.0));
        }
        let neighbors = self.index.neighbors(i, self.k)?;
        Ok(self.evaluate(i, &neighbors))
    }

    pub fn score_all(&self) -> ShimmerResult<Vec<BoundaryScore>> {
        aggregate(self.index, self.k, self)
    }

    /// Score from neighbor sets already computed for this index (one per
    /// entity, at least `k` neighbors each).
    pub fn score_with_neighbors(&self, sets: &[NeighborSet]) -> ShimmerResult<Vec<BoundaryScore>> {
        ShimmerError::check_len("neighbor sets", self.tags.len(), sets.len())?;
        aggregate_sets(sets, self.k, self)
    }

    fn finish(&self, i: usize, boundary: f64) -> BoundaryScore {
        BoundaryScore {
            boundary,
            shimmer: self.coherence[i] * boundary,
        }
    }
}

impl NeighborStatistic for BoundaryScorer<'_> {
    type Output = BoundaryScore;

    fn evaluate(&self, entity: usize, neighbors: &NeighborSet) -> BoundaryScore {
        let own = &self.tags[entity];
        if own.is_empty() || neighbors.is_empty() {
            return self.finish(entity, 1.0);
        }
        let k = neighbors.len() as f64;
        let overlap = own
            .iter()
            .map(|t| {
                let sharing = neighbors
                    .indices()
                    .filter(|&j| self.tags[j].contains(t))
                    .count();
                sharing as f64 / k
            })
            .sum::<f64>()
            / own.len() as f64;
        self.finish(entity, (1.0 - overlap).clamp(0.0, 1.0))
    }
}
