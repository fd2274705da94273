//! Connectome Shimmer Library
//!
//! Scores where an entity's labels and its geometry disagree.
//!
//! # Architecture
//!
//! - [`similarity`]: cosine similarity index with deterministic k-NN
//! - [`aggregate`]: the neighbor-aggregate primitive all neighborhood metrics share
//! - [`boundary`]: label/neighborhood divergence (S5)
//! - [`peak`], [`surprise`], [`bridging`]: sibling metrics S2b, S1, S3
//! - [`composite`]: normalized blend of the four metrics
//! - [`fidelity`]: neighbor preservation after lossy reconstruction
//! - [`engine`]: runs every metric over a corpus
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use connectome_shimmer::{BoundaryScorer, SimilarityIndex};
//!
//! let vectors = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]];
//! let index = SimilarityIndex::from_vectors(&vectors).unwrap();
//! let tags: Vec<HashSet<String>> = vec![
//!     ["#a".to_string()].into_iter().collect(),
//!     ["#b".to_string()].into_iter().collect(),
//!     ["#a".to_string()].into_iter().collect(),
//! ];
//! let scorer = BoundaryScorer::from_parts(&index, tags, vec![0.8; 3], 1).unwrap();
//! let score = scorer.score(0).unwrap();
//! assert_eq!(score.boundary, 1.0);
//! assert!((score.shimmer - 0.8).abs() < 1e-12);
//! ```

pub mod aggregate;
pub mod boundary;
pub mod bridging;
pub mod composite;
pub mod engine;
pub mod error;
pub mod fidelity;
pub mod peak;
pub mod similarity;
pub mod surprise;

pub use aggregate::{aggregate, aggregate_sets, NeighborStatistic};
pub use boundary::{BoundaryScore, BoundaryScorer};
pub use bridging::semantic_bridging;
pub use composite::{composite, min_max_normalize, CompositeScore};
pub use engine::{ShimmerEngine, ShimmerReport, ShimmerScores};
pub use error::{ShimmerError, ShimmerResult};
pub use fidelity::{cosine_fidelity, neighbor_overlap};
pub use peak::CoherencePeak;
pub use similarity::{Neighbor, NeighborSet, SimilarityIndex};
pub use surprise::topological_surprise;
