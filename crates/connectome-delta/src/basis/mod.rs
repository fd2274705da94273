//! Shared statistical reference frame: barycenter plus ordered principal
//! directions.
//!
//! A [`Basis`] is built once from a corpus snapshot by [`BasisBuilder`] and is
//! immutable afterwards; a rebuilt basis is a new artifact with a new
//! fingerprint. Tiers are prefixes of the same ordered direction list.

mod artifact;
mod builder;
mod fingerprint;
mod tier;

pub use artifact::BasisArtifact;
pub use builder::BasisBuilder;
pub use fingerprint::{Fingerprint, BASIS_HASH_LEN};
pub use tier::{Tier, TierBoundaries};

use chrono::{DateTime, Utc};

use crate::error::{BasisError, BasisResult};

#[derive(Debug, Clone)]
pub struct Basis {
    barycenter: Vec<f64>,
    /// M × D, row j is direction j.
    directions: Vec<Vec<f64>>,
    eigenvalues: Vec<f64>,
    cumulative_variance: Vec<f64>,
    fingerprint: Fingerprint,
    tiers: TierBoundaries,
    corpus_size: usize,
    computed_at: DateTime<Utc>,
}

impl Basis {
    /// Vector dimension D.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.barycenter.len()
    }

    /// Number of retained directions M.
    #[inline]
    pub fn mode_count(&self) -> usize {
        self.directions.len()
    }

    pub fn barycenter(&self) -> &[f64] {
        &self.barycenter
    }

    pub fn directions(&self) -> &[Vec<f64>] {
        &self.directions
    }

    pub fn direction(&self, j: usize) -> Option<&[f64]> {
        self.directions.get(j).map(Vec::as_slice)
    }

    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    pub fn cumulative_variance(&self) -> &[f64] {
        &self.cumulative_variance
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn basis_hash(&self) -> &str {
        self.fingerprint.as_hex()
    }

    /// Header fragment written into projected records.
    pub fn fragment(&self) -> u32 {
        self.fingerprint.fragment()
    }

    pub fn tiers(&self) -> TierBoundaries {
        self.tiers
    }

    pub fn tier_size(&self, tier: Tier) -> usize {
        self.tiers.size(tier)
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }

    pub fn computed_at(&self) -> DateTime<Utc> {
        self.computed_at
    }

    /// Fraction of total variance captured by the first `modes` directions.
    pub fn variance_captured(&self, modes: usize) -> f64 {
        match modes.min(self.cumulative_variance.len()) {
            0 => 0.0,
            m => self.cumulative_variance[m - 1],
        }
    }

    /// Coefficients of `vector - barycenter` on the first `modes` directions.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `vector.len() != D`
    /// - `InvalidTier` if `modes > M`
    pub fn project(&self, vector: &[f64], modes: usize) -> BasisResult<Vec<f64>> {
        if vector.len() != self.dimension() {
            return Err(BasisError::DimensionMismatch {
                row: 0,
                expected: self.dimension(),
                actual: vector.len(),
            });
        }
        if modes > self.mode_count() {
            return Err(BasisError::InvalidTier(format!(
                "{} modes requested, basis has {}",
                modes,
                self.mode_count()
            )));
        }
        Ok(self.project_unchecked(vector, modes))
    }

    /// `barycenter + Σ coefficients[j] × direction[j]`.
    ///
    /// Extra coefficients beyond M are ignored.
    pub fn reconstruct(&self, coefficients: &[f64]) -> Vec<f64> {
        let mut out = self.barycenter.clone();
        for (c, direction) in coefficients.iter().zip(&self.directions) {
            for (o, d) in out.iter_mut().zip(direction) {
                *o += c * d;
            }
        }
        out
    }

    /// Caller guarantees `vector.len() == D` and `modes <= M`.
    pub(crate) fn project_unchecked(&self, vector: &[f64], modes: usize) -> Vec<f64> {
        self.directions[..modes]
            .iter()
            .map(|direction| {
                direction
                    .iter()
                    .zip(vector.iter().zip(&self.barycenter))
                    .map(|(d, (v, b))| d * (v - b))
                    .sum()
            })
            .collect()
    }
}
