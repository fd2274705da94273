//! Insertion-ordered, deduplicated entity collection.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::entity::{Entity, EntityId};
use super::record::EntityRecord;
use crate::error::{CoreError, CoreResult};

/// Collection of entities sharing one vector dimension.
///
/// Row `i` of every derived matrix (similarity, projections, scores) refers
/// to `corpus.get_index(i)`. The first insertion of an id wins.
#[derive(Debug, Clone)]
pub struct Corpus {
    dimension: usize,
    entities: Vec<Entity>,
    by_id: HashMap<EntityId, usize>,
}

impl Corpus {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entities: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Build from entities, skipping duplicate ids.
    pub fn from_entities(
        dimension: usize,
        entities: impl IntoIterator<Item = Entity>,
    ) -> CoreResult<Self> {
        let mut corpus = Self::new(dimension);
        let mut skipped = 0usize;
        for entity in entities {
            if !corpus.insert(entity)? {
                skipped += 1;
            }
        }
        if skipped > 0 {
            warn!(skipped, kept = corpus.len(), "Skipped duplicate entity ids");
        }
        Ok(corpus)
    }

    /// Validate records and build a corpus; any invalid record fails the whole call.
    pub fn from_records(
        dimension: usize,
        records: impl IntoIterator<Item = EntityRecord>,
    ) -> CoreResult<Self> {
        let entities = records
            .into_iter()
            .map(|r| r.into_entity(dimension))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::from_entities(dimension, entities)
    }

    /// Insert an entity.
    ///
    /// Returns `Ok(false)` when the id is already present (the entity is
    /// dropped).
    ///
    /// # Errors
    ///
    /// `CoreError::DimensionMismatch` if the vector length differs from the
    /// corpus dimension.
    pub fn insert(&mut self, entity: Entity) -> CoreResult<bool> {
        if entity.vector().len() != self.dimension {
            return Err(CoreError::DimensionMismatch {
                expected: self.dimension,
                actual: entity.vector().len(),
            });
        }
        if self.by_id.contains_key(entity.id()) {
            debug!(id = %entity.id(), "Duplicate entity id, keeping first");
            return Ok(false);
        }
        self.by_id.insert(entity.id().clone(), self.entities.len());
        self.entities.push(entity);
        Ok(true)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.by_id.get(id).map(|&i| &self.entities[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Borrowed vectors in row order.
    pub fn vectors(&self) -> Vec<&[f64]> {
        self.entities.iter().map(|e| e.vector().as_slice()).collect()
    }

    pub fn ids(&self) -> Vec<&EntityId> {
        self.entities.iter().map(Entity::id).collect()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
