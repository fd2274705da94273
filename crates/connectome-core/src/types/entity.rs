//! Entity and its identifier.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::EntityRecord;
use super::tags::TagClassifier;
use super::vector::FeatureVector;
use crate::error::{CoreError, CoreResult};

/// Opaque entity identifier, unique across a corpus.
///
/// Ordering is lexicographic and is used as the deterministic tie-break when
/// two neighbors are equally similar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One feature-vector record with scalar and label metadata.
///
/// Built through [`Entity::new`], which validates every field. There are no
/// setters: an updated entity is a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    vector: FeatureVector,
    coherence: f64,
    energy: f64,
    tags: Vec<String>,
    tier: String,
}

impl Entity {
    /// Create a validated entity.
    ///
    /// Repeated tags are dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// - empty id
    /// - coherence outside `[0, 1]` or not finite
    /// - energy not finite
    pub fn new(
        id: impl Into<EntityId>,
        vector: FeatureVector,
        coherence: f64,
        energy: f64,
        tags: Vec<String>,
        tier: impl Into<String>,
    ) -> CoreResult<Self> {
        let id = id.into();
        if id.as_str().is_empty() {
            return Err(CoreError::validation("id", "entity id must not be empty"));
        }
        if !coherence.is_finite() || !(0.0..=1.0).contains(&coherence) {
            return Err(CoreError::validation(
                "coherence_score",
                format!("must be in [0, 1], got {}", coherence),
            ));
        }
        if !energy.is_finite() {
            return Err(CoreError::validation(
                "energy",
                format!("must be finite, got {}", energy),
            ));
        }

        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }

        Ok(Self {
            id,
            vector,
            coherence,
            energy,
            tags: unique,
            tier: tier.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    #[inline]
    pub fn vector(&self) -> &FeatureVector {
        &self.vector
    }

    #[inline]
    pub fn coherence(&self) -> f64 {
        self.coherence
    }

    #[inline]
    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn tier(&self) -> &str {
        &self.tier
    }

    /// Tags that are not reserved system tags.
    pub fn semantic_tags<'a>(&'a self, classifier: &TagClassifier) -> Vec<&'a str> {
        self.tags
            .iter()
            .map(String::as_str)
            .filter(|t| !classifier.is_system(t))
            .collect()
    }

    /// Convert back into the external record shape (no extra fields).
    pub fn to_record(&self) -> EntityRecord {
        EntityRecord {
            id: self.id.to_string(),
            amplitudes: self.vector.as_slice().to_vec(),
            coherence_score: self.coherence,
            energy: self.energy,
            tags: self.tags.clone(),
            tier: self.tier.clone(),
            extra: serde_json::Map::new(),
        }
    }
}
