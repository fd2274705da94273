//! Whole-corpus shimmer scoring.

use std::collections::HashMap;
use std::time::Instant;

use connectome_core::config::ShimmerConfig;
use connectome_core::{Config, Corpus, EntityId, EntityRecord, TagClassifier};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::boundary::BoundaryScorer;
use crate::bridging::semantic_bridging;
use crate::composite::composite;
use crate::error::{ShimmerError, ShimmerResult};
use crate::peak::CoherencePeak;
use crate::similarity::SimilarityIndex;
use crate::surprise::topological_surprise;

/// Every score computed for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShimmerScores {
    pub id: EntityId,
    pub s1: f64,
    pub s2b: f64,
    pub s3: f64,
    pub s5: f64,
    pub boundary: f64,
    pub composite_arithmetic: f64,
    pub composite_geometric: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ShimmerReport {
    scores: Vec<ShimmerScores>,
    by_id: HashMap<EntityId, usize>,
}

impl ShimmerReport {
    fn new(scores: Vec<ShimmerScores>) -> Self {
        let by_id = scores
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self { scores, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&ShimmerScores> {
        self.by_id
            .get(&EntityId::new(id))
            .map(|&i| &self.scores[i])
    }

    /// Scores in corpus order.
    pub fn iter(&self) -> std::slice::Iter<'_, ShimmerScores> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Write scores back into matching records. Returns how many records
    /// were updated; records without a score are left untouched.
    pub fn apply_to(&self, records: &mut [EntityRecord]) -> usize {
        let mut updated = 0;
        for record in records.iter_mut() {
            let Some(s) = self.get(&record.id) else {
                continue;
            };
            record.set_score("shimmer_s1", s.s1);
            record.set_score("shimmer_s2b", s.s2b);
            record.set_score("shimmer_s3", s.s3);
            record.set_score("shimmer_s5", s.s5);
            record.set_score("boundary_score", s.boundary);
            record.set_score("shimmer_composite", s.composite_arithmetic);
            record.set_score("shimmer_composite_geo", s.composite_geometric);
            updated += 1;
        }
        if updated < records.len() {
            warn!(
                updated,
                records = records.len(),
                "Some records had no shimmer scores"
            );
        }
        updated
    }
}

pub struct ShimmerEngine {
    config: ShimmerConfig,
    classifier: TagClassifier,
}

impl ShimmerEngine {
    /// # Errors
    ///
    /// `ConfigurationError` when `config` fails validation.
    pub fn new(config: ShimmerConfig, classifier: TagClassifier) -> ShimmerResult<Self> {
        config.validate().map_err(ShimmerError::ConfigurationError)?;
        Ok(Self { config, classifier })
    }

    pub fn from_config(config: &Config) -> ShimmerResult<Self> {
        Self::new(
            config.shimmer.clone(),
            TagClassifier::from_config(&config.tags),
        )
    }

    pub fn config(&self) -> &ShimmerConfig {
        &self.config
    }

    /// Run S1, S2b, S3, S5 and the composite over `corpus`.
    ///
    /// # Errors
    ///
    /// - `EmptyCorpus` for a corpus without entities
    /// - `ConfigurationError` when the corpus is too small for the
    ///   configured neighborhood sizes
    #[instrument(skip_all, fields(entities = corpus.len()))]
    pub fn score_corpus(&self, corpus: &Corpus) -> ShimmerResult<ShimmerReport> {
        let start = Instant::now();
        let index = SimilarityIndex::from_corpus(corpus)?;
        let coherence: Vec<f64> = corpus.iter().map(|e| e.coherence()).collect();

        let widest = self.config.boundary_k.max(self.config.peak_k);
        let sets = index.neighbors_in_blocks(widest, self.config.block_rows)?;

        let scorer = BoundaryScorer::new(&index, corpus, &self.classifier, self.config.boundary_k)?;
        let boundary = scorer.score_with_neighbors(&sets)?;
        let s5: Vec<f64> = boundary.iter().map(|b| b.shimmer).collect();
        let s2b = CoherencePeak::new(&coherence).score_with_neighbors(&sets, self.config.peak_k)?;
        let s1 = topological_surprise(&corpus.vectors(), &coherence)?;

        let tag_sets: Vec<_> = corpus
            .iter()
            .map(|e| self.classifier.semantic_set(e.tags()))
            .collect();
        let s3 = semantic_bridging(&tag_sets, &coherence)?;
        let combined = composite(&s1, &s2b, &s3, &s5)?;

        let scores: Vec<ShimmerScores> = corpus
            .iter()
            .enumerate()
            .map(|(i, e)| ShimmerScores {
                id: e.id().clone(),
                s1: s1[i],
                s2b: s2b[i],
                s3: s3[i],
                s5: s5[i],
                boundary: boundary[i].boundary,
                composite_arithmetic: combined[i].arithmetic,
                composite_geometric: combined[i].geometric,
            })
            .collect();

        let nonzero_geometric = scores.iter().filter(|s| s.composite_geometric > 0.0).count();
        info!(
            entities = scores.len(),
            boundary_k = self.config.boundary_k,
            peak_k = self.config.peak_k,
            block_rows = self.config.block_rows,
            nonzero_geometric,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scored corpus"
        );
        Ok(ShimmerReport::new(scores))
    }
}
