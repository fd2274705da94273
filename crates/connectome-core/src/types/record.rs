//! External entity record shape.
//!
//! One JSON object per entity. Fields this crate does not model (previously
//! written scores, provenance, …) are kept in `extra` so a record read and
//! written back loses nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::Entity;
use super::vector::FeatureVector;
use crate::error::{CoreError, CoreResult};

/// Coherence assumed when `coherence_score` is absent.
pub const DEFAULT_COHERENCE: f64 = 0.95;

/// Tier label assumed when `tier` is absent.
pub const DEFAULT_TIER: &str = "unknown";

/// Decimal places kept by [`EntityRecord::set_score`].
pub const SCORE_DECIMALS: i32 = 4;

fn default_coherence() -> f64 {
    DEFAULT_COHERENCE
}

fn default_tier() -> String {
    DEFAULT_TIER.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    pub amplitudes: Vec<f64>,
    #[serde(default = "default_coherence")]
    pub coherence_score: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_tier")]
    pub tier: String,
    /// Every other field, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntityRecord {
    pub fn from_json_str(s: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Compact single-line JSON.
    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Validate into an [`Entity`] of the given dimension.
    pub fn into_entity(self, dimension: usize) -> CoreResult<Entity> {
        if self.amplitudes.len() != dimension {
            return Err(CoreError::DimensionMismatch {
                expected: dimension,
                actual: self.amplitudes.len(),
            });
        }
        let vector = FeatureVector::new(self.amplitudes)?;
        Entity::new(
            self.id,
            vector,
            self.coherence_score,
            self.energy,
            self.tags,
            self.tier,
        )
    }

    /// Write a score field, rounded to [`SCORE_DECIMALS`] places.
    ///
    /// Non-finite values are stored as `null`.
    pub fn set_score(&mut self, name: &str, value: f64) {
        let factor = 10f64.powi(SCORE_DECIMALS);
        let rounded = (value * factor).round() / factor;
        self.extra.insert(name.to_string(), Value::from(rounded));
    }

    /// Read back a numeric extra field.
    pub fn score(&self, name: &str) -> Option<f64> {
        self.extra.get(name).and_then(Value::as_f64)
    }
}
