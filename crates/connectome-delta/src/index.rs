//! Compact coefficient index.
//!
//! One small JSON document per basis tier: every entity's quantized
//! projection coefficients plus a handful of display scores. Enough for a
//! client holding the basis to place every entity without the full vectors.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use connectome_core::config::CodecConfig;
use connectome_core::{Corpus, EntityId, TagClassifier};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::basis::{Basis, Tier};
use crate::codec::quantize_i16;
use crate::error::{BasisError, BasisResult};

/// At most this many semantic tags per entry.
pub const MAX_INDEX_TAGS: usize = 10;

/// Scores computed elsewhere and attached to index entries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndexScores {
    /// Boundary shimmer (S5).
    pub s5: Option<f64>,
    pub resonance: Option<f64>,
}

/// Knobs for [`CoefficientIndex::build`].
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub coefficient_scale: f64,
    pub classifier: TagClassifier,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            coefficient_scale: CodecConfig::default().coefficient_scale,
            classifier: TagClassifier::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: EntityId,
    #[serde(rename = "c")]
    pub coefficients: Vec<i16>,
    pub s5: f64,
    #[serde(rename = "coh")]
    pub coherence: f64,
    /// `c` core, `x` convergence, `r` anything else.
    pub tier: String,
    #[serde(rename = "res", default, skip_serializing_if = "Option::is_none")]
    pub resonance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientIndex {
    pub basis_hash: String,
    pub tier: u8,
    pub modes: usize,
    #[serde(rename = "spore_count")]
    pub entity_count: usize,
    pub computed_at: DateTime<Utc>,
    #[serde(rename = "spores")]
    pub entries: Vec<IndexEntry>,
}

impl CoefficientIndex {
    /// Project every entity of `corpus` onto the `tier` prefix of `basis`.
    ///
    /// Entities missing from `scores` get `s5 = 0` and no resonance; a zero
    /// resonance is dropped too.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` when the corpus and basis dimensions differ.
    #[instrument(skip_all, fields(entities = corpus.len(), tier = tier.number()))]
    pub fn build(
        corpus: &Corpus,
        basis: &Basis,
        tier: Tier,
        scores: &HashMap<EntityId, IndexScores>,
        options: &IndexOptions,
    ) -> BasisResult<Self> {
        if corpus.dimension() != basis.dimension() {
            return Err(BasisError::DimensionMismatch {
                row: 0,
                expected: basis.dimension(),
                actual: corpus.dimension(),
            });
        }
        let modes = basis.tier_size(tier);

        let entries: Vec<IndexEntry> = corpus
            .iter()
            .map(|entity| {
                let coefficients = basis
                    .project_unchecked(entity.vector().as_slice(), modes)
                    .into_iter()
                    .map(|c| quantize_i16(c, options.coefficient_scale))
                    .collect();
                let score = scores.get(entity.id()).copied().unwrap_or_default();
                let tags: Vec<String> = entity
                    .semantic_tags(&options.classifier)
                    .into_iter()
                    .take(MAX_INDEX_TAGS)
                    .map(str::to_string)
                    .collect();

                IndexEntry {
                    id: entity.id().clone(),
                    coefficients,
                    s5: round_to(score.s5.unwrap_or(0.0), 3),
                    coherence: round_to(entity.coherence(), 2),
                    tier: tier_letter(entity.tier()).to_string(),
                    resonance: score
                        .resonance
                        .filter(|r| *r != 0.0)
                        .map(|r| round_to(r, 3)),
                    tags,
                }
            })
            .collect();

        debug!(modes, entries = entries.len(), "Built coefficient index");
        Ok(Self {
            basis_hash: basis.basis_hash().to_string(),
            tier: tier.number(),
            modes,
            entity_count: entries.len(),
            computed_at: basis.computed_at(),
            entries,
        })
    }

    pub fn to_json_string(&self) -> BasisResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(json: &str) -> BasisResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn tier_letter(tier: &str) -> char {
    match tier {
        "core" => 'c',
        "convergence" => 'x',
        _ => 'r',
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
