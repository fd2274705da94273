//! Delta codec: one entity in, one compact integrity-checked record out.
//!
//! Two modes, chosen per record by the caller:
//! - **sparse**: changed dimensions against a baseline vector
//! - **projected**: dense coefficients on a tier prefix of a [`Basis`]
//!
//! Every function here is a pure data transform. Nothing is logged and no
//! I/O happens; batch helpers in [`crate::batch`] add parallelism and logging
//! on top.

mod checksum;
mod projected;
mod quantize;
mod record;
mod sparse;

pub use checksum::xor_fold;
pub use quantize::{dequantize_i16, dequantize_i8, max_error, quantize_i16, quantize_i8};
pub use record::{
    BaselineRef, DeltaEntry, DeltaRecord, EncodingMode, LayerCode, TypeCode, ENTRY_LEN,
    HEADER_LEN, MAX_ENTRIES, MIN_RECORD_LEN, PROJECTED_FLAG, TRAILER_LEN,
};
pub use sparse::{SparseSelection, MAX_SPARSE_DIMENSION};

use connectome_core::config::{CodecConfig, Config};
use connectome_core::Entity;

use crate::basis::Basis;
use crate::error::{CodecResult, DecodeError, EncodeError};

/// Scalar metadata carried next to the vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityMetadata {
    pub coherence: f64,
    pub energy: f64,
}

impl EntityMetadata {
    pub fn new(coherence: f64, energy: f64) -> Self {
        Self { coherence, energy }
    }

    pub fn of(entity: &Entity) -> Self {
        Self::new(entity.coherence(), entity.energy())
    }
}

/// Reference an entity is encoded against.
///
/// Sparse mode uses the vector and the metadata; projected mode uses only the
/// metadata (the vector reference is the basis barycenter).
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    reference: BaselineRef,
    vector: Vec<f64>,
    metadata: EntityMetadata,
}

impl Baseline {
    pub fn new(reference: BaselineRef, vector: Vec<f64>, metadata: EntityMetadata) -> Self {
        Self {
            reference,
            vector,
            metadata,
        }
    }

    /// Use an existing entity (for example a calibration anchor) as baseline.
    pub fn from_entity(reference: BaselineRef, entity: &Entity) -> Self {
        Self::new(
            reference,
            entity.vector().as_slice().to_vec(),
            EntityMetadata::of(entity),
        )
    }

    /// The basis barycenter with the given reference metadata.
    pub fn from_basis(basis: &Basis, metadata: EntityMetadata) -> Self {
        Self::new(
            BaselineRef::BARYCENTER,
            basis.barycenter().to_vec(),
            metadata,
        )
    }

    pub fn reference(&self) -> BaselineRef {
        self.reference
    }

    pub fn vector(&self) -> &[f64] {
        &self.vector
    }

    pub fn metadata(&self) -> EntityMetadata {
        self.metadata
    }
}

/// Header fields chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOptions {
    pub layer: LayerCode,
    /// Written as-is by sparse mode; projected mode always writes the
    /// basis fragment.
    pub fragment: u32,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        Self {
            layer: LayerCode::TierMeta,
            fragment: 0,
        }
    }
}

impl HeaderOptions {
    pub fn layer(layer: LayerCode) -> Self {
        Self {
            layer,
            ..Default::default()
        }
    }

    /// Stamp sparse records with a basis fragment too.
    pub fn with_basis(mut self, basis: &Basis) -> Self {
        self.fragment = basis.fragment();
        self
    }
}

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub vector: Vec<f64>,
    pub metadata: EntityMetadata,
    pub layer: LayerCode,
    pub mode: EncodingMode,
    pub baseline: BaselineRef,
    pub fragment: u32,
}

/// Encoder/decoder bound to one set of codec constants.
#[derive(Debug, Clone, Default)]
pub struct DeltaCodec {
    config: CodecConfig,
}

impl DeltaCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.codec.clone())
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Worst per-dimension error of a sparse round trip: skipped dimensions
    /// are off by at most the threshold, encoded ones by half a step.
    pub fn sparse_error_bound(&self) -> f64 {
        self.config
            .sparse_threshold
            .max(max_error(self.config.amplitude_scale))
    }

    /// Per-dimension quantization error of a projected round trip over
    /// `modes` orthonormal directions. The residual outside the tier span
    /// comes on top.
    pub fn projected_error_bound(&self, modes: usize) -> f64 {
        (modes as f64).sqrt() * max_error(self.config.coefficient_scale)
    }

    /// Parse, verify and reconstruct a record.
    ///
    /// `basis` is only consulted for projected records.
    ///
    /// # Errors
    ///
    /// - `Truncated`, `ChecksumMismatch`, `LengthMismatch`, `UnknownTypeCode`
    ///   from [`DeltaRecord::parse`]
    /// - `IndexOutOfRange` for an entry beyond D (sparse) or M (projected)
    /// - `MissingBasis`, `BasisMismatch` for projected records
    pub fn decode(
        &self,
        bytes: &[u8],
        baseline: &Baseline,
        basis: Option<&Basis>,
    ) -> CodecResult<DecodedEntity> {
        let record = DeltaRecord::parse(bytes)?;
        self.decode_record(&record, baseline, basis)
    }

    /// Reconstruct an already-parsed record.
    pub fn decode_record(
        &self,
        record: &DeltaRecord,
        baseline: &Baseline,
        basis: Option<&Basis>,
    ) -> CodecResult<DecodedEntity> {
        let vector = match record.mode() {
            EncodingMode::Sparse => self.reconstruct_sparse(record, baseline)?,
            EncodingMode::Projected => {
                let basis = basis.ok_or(DecodeError::MissingBasis)?;
                self.reconstruct_projected(record, basis)?
            }
        };

        let base = baseline.metadata();
        let metadata = EntityMetadata {
            coherence: base.coherence
                + dequantize_i8(record.coherence_delta, self.config.coherence_scale),
            energy: base.energy + dequantize_i8(record.energy_delta, self.config.energy_scale),
        };

        Ok(DecodedEntity {
            vector,
            metadata,
            layer: record.type_code.layer,
            mode: record.mode(),
            baseline: record.baseline,
            fragment: record.fragment,
        })
    }

    fn metadata_deltas(&self, metadata: EntityMetadata, baseline: &Baseline) -> (i8, i8) {
        let base = baseline.metadata();
        (
            quantize_i8(
                metadata.coherence - base.coherence,
                self.config.coherence_scale,
            ),
            quantize_i8(metadata.energy - base.energy, self.config.energy_scale),
        )
    }
}

/// Space saved, in percent of `original_size`.
pub fn compression_ratio(original_size: usize, encoded_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    100.0 * (1.0 - encoded_size as f64 / original_size as f64)
}

pub(crate) fn check_finite(values: &[f64], field: &'static str) -> CodecResult<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EncodeError::NonFiniteValue { field }.into())
    }
}
