//! JSON artifact form of a [`Basis`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fingerprint::Fingerprint;
use super::tier::TierBoundaries;
use super::Basis;
use crate::error::{BasisError, BasisResult};

/// Tolerance for unit-norm and non-increasing checks on loaded artifacts.
const ARTIFACT_EPSILON: f64 = 1e-6;

/// Serialized basis, as exchanged with external tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasisArtifact {
    pub barycenter: Vec<f64>,
    pub eigenvectors: Vec<Vec<f64>>,
    pub eigenvalues: Vec<f64>,
    pub cumulative_variance: Vec<f64>,
    pub basis_hash: String,
    pub spore_count: usize,
    pub tier1_modes: usize,
    pub tier2_modes: usize,
    pub tier3_modes: usize,
    pub computed_at: DateTime<Utc>,
}

impl BasisArtifact {
    pub fn from_json_str(s: &str) -> BasisResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> BasisResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> BasisResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate_shapes(&self) -> BasisResult<()> {
        let d = self.barycenter.len();
        let m = self.eigenvectors.len();
        if d == 0 {
            return Err(BasisError::InvalidArtifact("empty barycenter".to_string()));
        }
        if let Some((j, row)) = self.eigenvectors.iter().enumerate().find(|(_, r)| r.len() != d) {
            return Err(BasisError::InvalidArtifact(format!(
                "eigenvector {} has length {}, barycenter has {}",
                j,
                row.len(),
                d
            )));
        }
        if self.eigenvalues.len() != m || self.cumulative_variance.len() != m {
            return Err(BasisError::InvalidArtifact(format!(
                "{} eigenvectors but {} eigenvalues and {} cumulative variance entries",
                m,
                self.eigenvalues.len(),
                self.cumulative_variance.len()
            )));
        }
        let all_finite = self
            .barycenter
            .iter()
            .chain(self.eigenvectors.iter().flatten())
            .chain(&self.eigenvalues)
            .chain(&self.cumulative_variance)
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(BasisError::InvalidArtifact("non-finite value".to_string()));
        }
        for (j, row) in self.eigenvectors.iter().enumerate() {
            let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
            if (norm - 1.0).abs() > ARTIFACT_EPSILON {
                return Err(BasisError::InvalidArtifact(format!(
                    "eigenvector {} is not unit norm ({})",
                    j, norm
                )));
            }
        }
        if self
            .eigenvalues
            .windows(2)
            .any(|w| w[1] > w[0] + ARTIFACT_EPSILON)
        {
            return Err(BasisError::InvalidArtifact(
                "eigenvalues are not non-increasing".to_string(),
            ));
        }
        let cv_ok = self
            .cumulative_variance
            .iter()
            .all(|v| (-ARTIFACT_EPSILON..=1.0 + ARTIFACT_EPSILON).contains(v))
            && self
                .cumulative_variance
                .windows(2)
                .all(|w| w[1] + ARTIFACT_EPSILON >= w[0]);
        if !cv_ok {
            return Err(BasisError::InvalidArtifact(
                "cumulative variance must be in [0, 1] and non-decreasing".to_string(),
            ));
        }
        Ok(())
    }

    fn into_basis(self, fingerprint: Fingerprint) -> BasisResult<Basis> {
        let tiers = TierBoundaries {
            coarse: self.tier1_modes,
            standard: self.tier2_modes,
            full: self.tier3_modes,
        };
        tiers.check(self.eigenvectors.len())?;
        Ok(Basis {
            barycenter: self.barycenter,
            directions: self.eigenvectors,
            eigenvalues: self.eigenvalues,
            cumulative_variance: self.cumulative_variance,
            fingerprint,
            tiers,
            corpus_size: self.spore_count,
            computed_at: self.computed_at,
        })
    }
}

impl Basis {
    pub fn to_artifact(&self) -> BasisArtifact {
        BasisArtifact {
            barycenter: self.barycenter.clone(),
            eigenvectors: self.directions.clone(),
            eigenvalues: self.eigenvalues.clone(),
            cumulative_variance: self.cumulative_variance.clone(),
            basis_hash: self.basis_hash().to_string(),
            spore_count: self.corpus_size,
            tier1_modes: self.tiers.coarse,
            tier2_modes: self.tiers.standard,
            tier3_modes: self.tiers.full,
            computed_at: self.computed_at,
        }
    }

    /// Load and verify an artifact.
    ///
    /// # Errors
    ///
    /// `InvalidArtifact` for broken shapes or invariants, `FingerprintMismatch`
    /// when `basis_hash` differs from the fingerprint recomputed from the
    /// numbers.
    pub fn from_artifact(artifact: BasisArtifact) -> BasisResult<Self> {
        artifact.validate_shapes()?;
        let computed = Fingerprint::compute(
            &artifact.barycenter,
            artifact.eigenvectors.iter().map(Vec::as_slice),
        );
        if !computed.as_hex().eq_ignore_ascii_case(&artifact.basis_hash) {
            return Err(BasisError::FingerprintMismatch {
                stored: artifact.basis_hash,
                computed: computed.as_hex().to_string(),
            });
        }
        artifact.into_basis(computed)
    }

    /// Load an artifact keeping its stored `basis_hash`.
    ///
    /// For artifacts whose numbers were rounded when written, so the
    /// recomputed fingerprint no longer matches. Records encoded against the
    /// original keep decoding because the header fragment comes from the
    /// stored hash. A mismatch is logged, not returned.
    pub fn from_artifact_trusted(artifact: BasisArtifact) -> BasisResult<Self> {
        artifact.validate_shapes()?;
        let stored = Fingerprint::from_hex(&artifact.basis_hash).ok_or_else(|| {
            BasisError::InvalidArtifact(format!(
                "basis_hash {:?} is not 16 hex digits",
                artifact.basis_hash
            ))
        })?;
        let computed = Fingerprint::compute(
            &artifact.barycenter,
            artifact.eigenvectors.iter().map(Vec::as_slice),
        );
        if computed != stored {
            warn!(
                stored = %stored,
                computed = %computed,
                "Basis artifact hash does not match its contents; keeping stored hash"
            );
        }
        artifact.into_basis(stored)
    }
}
