//! Domain types for the connectome corpus.

mod corpus;
mod entity;
mod record;
mod tags;
mod vector;

pub use corpus::Corpus;
pub use entity::{Entity, EntityId};
pub use record::{EntityRecord, DEFAULT_COHERENCE, DEFAULT_TIER, SCORE_DECIMALS};
pub use tags::{TagClassifier, TagPartition};
pub use vector::FeatureVector;
