//! Cosine similarity index with deterministic k-nearest-neighbor lookup.
//!
//! Rows are L2-normalized once at construction; similarities are computed
//! row by row on demand, so memory stays at O(n·D). Callers wanting the
//! full matrix materialize it in blocks via [`SimilarityIndex::similarity_block`].

use std::cmp::Ordering;
use std::ops::Range;

use connectome_core::{Corpus, EntityId};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{ShimmerError, ShimmerResult};

/// One neighbor of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub similarity: f64,
}

/// The k nearest neighbors of one entity, most similar first.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSet {
    pub entity: usize,
    pub neighbors: Vec<Neighbor>,
}

impl NeighborSet {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().map(|n| n.index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
        self.neighbors.iter()
    }

    /// The `k` most similar neighbors; the whole set when `k >= len`.
    pub fn truncated(&self, k: usize) -> NeighborSet {
        NeighborSet {
            entity: self.entity,
            neighbors: self.neighbors.iter().take(k).copied().collect(),
        }
    }

    /// Mean of `1 - similarity` over the neighbors; 0 when empty.
    pub fn mean_distance(&self) -> f64 {
        if self.neighbors.is_empty() {
            return 0.0;
        }
        self.neighbors.iter().map(|n| 1.0 - n.similarity).sum::<f64>()
            / self.neighbors.len() as f64
    }
}

#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    rows: Vec<Vec<f64>>,
    ids: Option<Vec<EntityId>>,
    /// Position of each row in tie-break order (id ascending, else row index).
    tie_rank: Vec<usize>,
    dimension: usize,
}

impl SimilarityIndex {
    /// Index a corpus, keeping its ids for tie-breaking.
    ///
    /// # Errors
    ///
    /// `EmptyCorpus` for a corpus without entities.
    pub fn from_corpus(corpus: &Corpus) -> ShimmerResult<Self> {
        if corpus.is_empty() {
            return Err(ShimmerError::EmptyCorpus);
        }
        let rows: Vec<Vec<f64>> = corpus.iter().map(|e| e.vector().normalized()).collect();
        let ids: Vec<EntityId> = corpus.iter().map(|e| e.id().clone()).collect();

        let mut order: Vec<usize> = (0..ids.len()).collect();
        order.sort_by(|&a, &b| ids[a].cmp(&ids[b]));
        let mut tie_rank = vec![0; ids.len()];
        for (rank, &row) in order.iter().enumerate() {
            tie_rank[row] = rank;
        }

        let index = Self {
            rows,
            ids: Some(ids),
            tie_rank,
            dimension: corpus.dimension(),
        };
        info!(
            entities = index.len(),
            dimension = index.dimension,
            "Built similarity index"
        );
        Ok(index)
    }

    /// Index raw vectors; ties break by row index.
    ///
    /// # Errors
    ///
    /// - `EmptyCorpus` for no vectors
    /// - `DimensionMismatch` when a row differs in length from the first
    /// - `ConfigurationError` for non-finite values
    pub fn from_vectors<V: AsRef<[f64]>>(vectors: &[V]) -> ShimmerResult<Self> {
        let first = vectors.first().ok_or(ShimmerError::EmptyCorpus)?;
        let dimension = first.as_ref().len();

        let mut rows = Vec::with_capacity(vectors.len());
        for (row, v) in vectors.iter().enumerate() {
            let v = v.as_ref();
            if v.len() != dimension {
                return Err(ShimmerError::DimensionMismatch {
                    row,
                    expected: dimension,
                    actual: v.len(),
                });
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(ShimmerError::ConfigurationError(format!(
                    "row {} contains non-finite values",
                    row
                )));
            }
            rows.push(normalize(v));
        }

        debug!(entities = rows.len(), dimension, "Built similarity index from vectors");
        Ok(Self {
            tie_rank: (0..rows.len()).collect(),
            rows,
            ids: None,
            dimension,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn id(&self, i: usize) -> Option<&EntityId> {
        self.ids.as_ref().and_then(|ids| ids.get(i))
    }

    /// Normalized row `i`.
    pub fn row(&self, i: usize) -> ShimmerResult<&[f64]> {
        self.rows
            .get(i)
            .map(Vec::as_slice)
            .ok_or(ShimmerError::IndexOutOfBounds {
                index: i,
                len: self.len(),
            })
    }

    pub fn similarity(&self, i: usize, j: usize) -> ShimmerResult<f64> {
        Ok(dot(self.row(i)?, self.row(j)?))
    }

    /// Cosine similarity of `i` to every row, self included.
    pub fn similarity_row(&self, i: usize) -> ShimmerResult<Vec<f64>> {
        let row = self.row(i)?;
        Ok(self.rows.iter().map(|other| dot(row, other)).collect())
    }

    /// Similarity rows for `rows`, computed in parallel.
    pub fn similarity_block(&self, rows: Range<usize>) -> ShimmerResult<Vec<Vec<f64>>> {
        if rows.end > self.len() {
            return Err(ShimmerError::IndexOutOfBounds {
                index: rows.end.saturating_sub(1),
                len: self.len(),
            });
        }
        rows.into_par_iter().map(|i| self.similarity_row(i)).collect()
    }

    /// Fails unless `0 < k < len`.
    pub fn check_k(&self, k: usize) -> ShimmerResult<()> {
        if k == 0 {
            return Err(ShimmerError::ConfigurationError(
                "neighborhood size k must be > 0".to_string(),
            ));
        }
        if self.len() <= k {
            return Err(ShimmerError::ConfigurationError(format!(
                "neighborhood size k={} needs more than {} entities, corpus has {}",
                k,
                k,
                self.len()
            )));
        }
        Ok(())
    }

    /// The `k` entities most similar to `i`, excluding `i` itself.
    ///
    /// Order is similarity descending, then id ascending (row index when the
    /// index was built from raw vectors).
    ///
    /// # Errors
    ///
    /// - `IndexOutOfBounds` if `i >= len`
    /// - `ConfigurationError` if `k == 0` or `len <= k`
    pub fn neighbors(&self, i: usize, k: usize) -> ShimmerResult<NeighborSet> {
        let sims = self.similarity_row(i)?;
        self.check_k(k)?;
        Ok(self.select_neighbors(i, sims, k))
    }

    /// Neighbor sets for every entity, computing similarity rows
    /// `block_rows` at a time so at most `block_rows × len` similarities are
    /// held at once.
    ///
    /// Produces the same sets as [`all_neighbors`](Self::all_neighbors).
    ///
    /// # Errors
    ///
    /// `ConfigurationError` for an unusable `k` or `block_rows == 0`.
    pub fn neighbors_in_blocks(
        &self,
        k: usize,
        block_rows: usize,
    ) -> ShimmerResult<Vec<NeighborSet>> {
        self.check_k(k)?;
        if block_rows == 0 {
            return Err(ShimmerError::ConfigurationError(
                "block_rows must be > 0".to_string(),
            ));
        }
        let mut sets = Vec::with_capacity(self.len());
        for start in (0..self.len()).step_by(block_rows) {
            let end = (start + block_rows).min(self.len());
            let block = self.similarity_block(start..end)?;
            let selected: Vec<NeighborSet> = block
                .into_par_iter()
                .enumerate()
                .map(|(offset, sims)| self.select_neighbors(start + offset, sims, k))
                .collect();
            sets.extend(selected);
        }
        debug!(
            entities = sets.len(),
            k,
            block_rows,
            "Computed neighbor sets in blocks"
        );
        Ok(sets)
    }

    /// Top `k` of a similarity row for entity `i`; `k` already checked.
    fn select_neighbors(&self, i: usize, mut sims: Vec<f64>, k: usize) -> NeighborSet {
        sims[i] = f64::NEG_INFINITY;

        // Rows are finite, so partial_cmp only sees finite values and -inf;
        // it also treats 0.0 and -0.0 as a tie.
        let order = |a: &usize, b: &usize| -> Ordering {
            sims[*b]
                .partial_cmp(&sims[*a])
                .unwrap_or(Ordering::Equal)
                .then(self.tie_rank[*a].cmp(&self.tie_rank[*b]))
        };
        let mut candidates: Vec<usize> = (0..self.len()).collect();
        candidates.select_nth_unstable_by(k - 1, order);
        candidates.truncate(k);
        candidates.sort_unstable_by(order);

        NeighborSet {
            entity: i,
            neighbors: candidates
                .into_iter()
                .map(|j| Neighbor {
                    index: j,
                    similarity: sims[j],
                })
                .collect(),
        }
    }

    /// Neighbor sets for every entity, in row order.
    pub fn all_neighbors(&self, k: usize) -> ShimmerResult<Vec<NeighborSet>> {
        self.check_k(k)?;
        (0..self.len())
            .into_par_iter()
            .map(|i| self.neighbors(i, k))
            .collect()
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Unit vector in the direction of `v`; the zero vector stays zero.
pub(crate) fn normalize(v: &[f64]) -> Vec<f64> {
    let norm = dot(v, v).sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}
