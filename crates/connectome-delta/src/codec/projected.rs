//! Projected mode: dense coefficients on a tier prefix of the basis.

use super::quantize::{dequantize_i16, quantize_i16};
use super::record::{DeltaEntry, DeltaRecord, EncodingMode, TypeCode, MAX_ENTRIES};
use super::{check_finite, Baseline, DeltaCodec, EntityMetadata, HeaderOptions};
use crate::basis::{Basis, Tier};
use crate::error::{CodecError, CodecResult, DecodeError, EncodeError};

impl DeltaCodec {
    /// Encode `vector` as its coefficients on the first `tier` directions.
    ///
    /// Entry `j` holds the coefficient of direction `j`. The header carries
    /// the basis fragment regardless of `opts.fragment`; the baseline only
    /// supplies the reference byte and metadata.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `vector.len()` differs from the basis dimension
    /// - `NonFiniteValue` for NaN/Infinity in any input
    pub fn encode_projected(
        &self,
        vector: &[f64],
        metadata: EntityMetadata,
        baseline: &Baseline,
        basis: &Basis,
        tier: Tier,
        opts: HeaderOptions,
    ) -> CodecResult<DeltaRecord> {
        self.encode_projected_modes(
            vector,
            metadata,
            baseline,
            basis,
            basis.tier_size(tier),
            opts,
        )
    }

    /// Encode on an explicit number of leading directions.
    ///
    /// # Errors
    ///
    /// As [`encode_projected`](Self::encode_projected), plus `TierOutOfRange`
    /// when `modes` exceeds the basis and `CapacityExceeded` above 255.
    pub fn encode_projected_modes(
        &self,
        vector: &[f64],
        metadata: EntityMetadata,
        baseline: &Baseline,
        basis: &Basis,
        modes: usize,
        opts: HeaderOptions,
    ) -> CodecResult<DeltaRecord> {
        if vector.len() != basis.dimension() {
            return Err(EncodeError::DimensionMismatch {
                expected: basis.dimension(),
                actual: vector.len(),
            }
            .into());
        }
        if modes > basis.mode_count() {
            return Err(EncodeError::TierOutOfRange {
                requested: modes,
                available: basis.mode_count(),
            }
            .into());
        }
        if modes > MAX_ENTRIES {
            return Err(EncodeError::CapacityExceeded {
                count: modes,
                max: MAX_ENTRIES,
            }
            .into());
        }
        check_finite(vector, "vector")?;
        check_finite(&[metadata.coherence, metadata.energy], "metadata")?;

        let entries = basis
            .project_unchecked(vector, modes)
            .into_iter()
            .enumerate()
            .map(|(j, c)| DeltaEntry {
                index: j as u8,
                value: quantize_i16(c, self.config.coefficient_scale),
            })
            .collect();
        let (coherence_delta, energy_delta) = self.metadata_deltas(metadata, baseline);

        Ok(DeltaRecord {
            fragment: basis.fragment(),
            type_code: TypeCode::new(opts.layer, EncodingMode::Projected),
            baseline: baseline.reference(),
            entries,
            coherence_delta,
            energy_delta,
        })
    }

    /// The vector reference is the basis barycenter; the baseline vector is
    /// never read.
    pub(super) fn reconstruct_projected(
        &self,
        record: &DeltaRecord,
        basis: &Basis,
    ) -> CodecResult<Vec<f64>> {
        if record.fragment != basis.fragment() {
            return Err(CodecError::BasisMismatch {
                record: record.fragment,
                basis: basis.fragment(),
            });
        }

        let limit = basis.mode_count();
        let mut coefficients = vec![0.0; limit];
        for entry in &record.entries {
            let j = entry.index as usize;
            let slot = coefficients
                .get_mut(j)
                .ok_or(DecodeError::IndexOutOfRange { index: j, limit })?;
            *slot = dequantize_i16(entry.value, self.config.coefficient_scale);
        }
        Ok(basis.reconstruct(&coefficients))
    }
}
