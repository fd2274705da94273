//! Connectome Delta Library
//!
//! Shared PCA basis and compact delta records for connectome entities.
//!
//! # Architecture
//!
//! - [`basis`]: barycenter plus ordered principal directions, tier prefixes,
//!   fingerprint and the JSON artifact
//! - [`codec`]: sparse and projected delta records with an XOR checksum
//! - [`batch`]: parallel encode/decode over a whole corpus
//! - [`index`]: per-tier coefficient index for lightweight clients
//! - [`resonance`]: rational-approximation score over leading coefficients
//!
//! # Example
//!
//! ```
//! use connectome_delta::codec::{Baseline, BaselineRef, DeltaCodec, EntityMetadata, HeaderOptions};
//!
//! let codec = DeltaCodec::default();
//! let baseline = Baseline::new(BaselineRef(0x02), vec![0.0; 8], EntityMetadata::new(0.98, 0.387));
//! let mut v = vec![0.0; 8];
//! v[3] = 0.25;
//!
//! let record = codec
//!     .encode_sparse(&v, EntityMetadata::new(0.9, 0.4), &baseline, HeaderOptions::default())
//!     .unwrap();
//! let bytes = record.to_bytes().unwrap();
//! assert_eq!(bytes.len(), 7 + 3 + 3);
//!
//! let decoded = codec.decode(&bytes, &baseline, None).unwrap();
//! assert!((decoded.vector[3] - 0.25).abs() < 1e-3);
//! ```

pub mod basis;
pub mod batch;
pub mod codec;
pub mod error;
pub mod index;
pub mod resonance;

pub use basis::{Basis, BasisArtifact, BasisBuilder, Fingerprint, Tier, TierBoundaries};
pub use codec::{
    compression_ratio, Baseline, BaselineRef, DecodedEntity, DeltaCodec, DeltaRecord,
    EncodingMode, EntityMetadata, HeaderOptions, LayerCode, SparseSelection,
};
pub use error::{
    BasisError, BasisResult, CodecError, CodecResult, DecodeError, EncodeError, IntegrityError,
};
pub use index::{CoefficientIndex, IndexOptions, IndexScores};
pub use resonance::resonance_scores;
