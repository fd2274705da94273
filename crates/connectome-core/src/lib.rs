//! Connectome Core Library
//!
//! Provides the domain types shared by the delta codec and the shimmer
//! scorers: feature vectors, entities, tag classification and the corpus
//! container, together with the error type, configuration and logging setup.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`FeatureVector`, `Entity`, `Corpus`, `TagClassifier`)
//! - The entity record shape exchanged with ingestion and writeback
//! - Error types and result aliases
//! - Configuration structures for every subsystem
//!
//! # Example
//!
//! ```
//! use connectome_core::types::{Corpus, Entity, FeatureVector};
//!
//! let mut corpus = Corpus::new(3);
//! let entity = Entity::new(
//!     "a1",
//!     FeatureVector::new(vec![0.1, 0.2, 0.3]).unwrap(),
//!     0.9,
//!     0.4,
//!     vec!["#resonance".to_string()],
//!     "reference",
//! )
//! .unwrap();
//! assert!(corpus.insert(entity).unwrap());
//! assert_eq!(corpus.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use types::{Corpus, Entity, EntityId, EntityRecord, FeatureVector, TagClassifier, TagPartition};
