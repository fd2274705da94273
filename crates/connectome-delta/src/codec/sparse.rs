//! Sparse mode: changed dimensions against a baseline vector.

use super::quantize::{dequantize_i16, quantize_i16};
use super::record::{DeltaEntry, DeltaRecord, EncodingMode, TypeCode, MAX_ENTRIES};
use super::{check_finite, Baseline, DeltaCodec, EntityMetadata, HeaderOptions};
use crate::error::{CodecResult, DecodeError, EncodeError};

/// Largest dimension addressable by a one-byte index.
pub const MAX_SPARSE_DIMENSION: usize = u8::MAX as usize + 1;

/// Which dimensions a sparse record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SparseSelection {
    /// Every dimension whose delta magnitude exceeds the configured threshold.
    #[default]
    Threshold,
    /// The `k` largest non-zero delta magnitudes, ties to the lower index.
    TopK(usize),
}

impl DeltaCodec {
    /// Encode with the threshold rule.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if vector and baseline lengths differ
    /// - `DimensionTooLarge` above 256 dimensions
    /// - `NonFiniteValue` for NaN/Infinity in any input
    /// - `CapacityExceeded` when more than 255 dimensions changed
    pub fn encode_sparse(
        &self,
        vector: &[f64],
        metadata: EntityMetadata,
        baseline: &Baseline,
        opts: HeaderOptions,
    ) -> CodecResult<DeltaRecord> {
        self.encode_sparse_with(vector, metadata, baseline, SparseSelection::Threshold, opts)
    }

    pub fn encode_sparse_with(
        &self,
        vector: &[f64],
        metadata: EntityMetadata,
        baseline: &Baseline,
        selection: SparseSelection,
        opts: HeaderOptions,
    ) -> CodecResult<DeltaRecord> {
        let base = baseline.vector();
        if vector.len() != base.len() {
            return Err(EncodeError::DimensionMismatch {
                expected: base.len(),
                actual: vector.len(),
            }
            .into());
        }
        if vector.len() > MAX_SPARSE_DIMENSION {
            return Err(EncodeError::DimensionTooLarge {
                dimension: vector.len(),
                max: MAX_SPARSE_DIMENSION,
            }
            .into());
        }
        check_finite(vector, "vector")?;
        check_finite(base, "baseline")?;
        check_finite(&[metadata.coherence, metadata.energy], "metadata")?;

        let deltas: Vec<f64> = vector.iter().zip(base).map(|(v, b)| v - b).collect();
        let selected = select(&deltas, selection, self.config.sparse_threshold);
        if selected.len() > MAX_ENTRIES {
            return Err(EncodeError::CapacityExceeded {
                count: selected.len(),
                max: MAX_ENTRIES,
            }
            .into());
        }

        let entries = selected
            .into_iter()
            .map(|d| DeltaEntry {
                index: d as u8,
                value: quantize_i16(deltas[d], self.config.amplitude_scale),
            })
            .collect();
        let (coherence_delta, energy_delta) = self.metadata_deltas(metadata, baseline);

        Ok(DeltaRecord {
            fragment: opts.fragment,
            type_code: TypeCode::new(opts.layer, EncodingMode::Sparse),
            baseline: baseline.reference(),
            entries,
            coherence_delta,
            energy_delta,
        })
    }

    pub(super) fn reconstruct_sparse(
        &self,
        record: &DeltaRecord,
        baseline: &Baseline,
    ) -> CodecResult<Vec<f64>> {
        let mut vector = baseline.vector().to_vec();
        let limit = vector.len();
        for entry in &record.entries {
            let d = entry.index as usize;
            let slot = vector
                .get_mut(d)
                .ok_or(DecodeError::IndexOutOfRange { index: d, limit })?;
            *slot += dequantize_i16(entry.value, self.config.amplitude_scale);
        }
        Ok(vector)
    }
}

/// Selected dimension indices, ascending.
fn select(deltas: &[f64], selection: SparseSelection, threshold: f64) -> Vec<usize> {
    match selection {
        SparseSelection::Threshold => (0..deltas.len())
            .filter(|&d| deltas[d].abs() > threshold)
            .collect(),
        SparseSelection::TopK(k) => {
            let mut nonzero: Vec<usize> = (0..deltas.len()).filter(|&d| deltas[d] != 0.0).collect();
            nonzero.sort_by(|&a, &b| {
                deltas[b]
                    .abs()
                    .total_cmp(&deltas[a].abs())
                    .then(a.cmp(&b))
            });
            nonzero.truncate(k);
            nonzero.sort_unstable();
            nonzero
        }
    }
}
