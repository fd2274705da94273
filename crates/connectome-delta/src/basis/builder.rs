//! PCA basis construction.

use chrono::Utc;
use connectome_core::config::{BasisConfig, Config};
use connectome_core::{CoreError, Corpus};
use nalgebra::{DMatrix, SymmetricEigen};
use tracing::{debug, info, instrument};

use super::fingerprint::Fingerprint;
use super::tier::{Tier, TierBoundaries};
use super::Basis;
use crate::error::{BasisError, BasisResult};

/// Builds a [`Basis`] from a corpus snapshot.
///
/// Deterministic for a fixed row order: the eigenpairs are ranked by
/// descending eigenvalue with ties broken by decomposition index, and every
/// direction's largest-magnitude component is made positive.
#[derive(Debug, Clone, Default)]
pub struct BasisBuilder {
    config: BasisConfig,
}

impl BasisBuilder {
    pub fn new(config: BasisConfig) -> Self {
        Self { config }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.basis.clone())
    }

    pub fn config(&self) -> &BasisConfig {
        &self.config
    }

    #[instrument(skip(self, corpus), fields(corpus_size = corpus.len()), level = "debug")]
    pub fn build(&self, corpus: &Corpus) -> BasisResult<Basis> {
        self.build_from_vectors(&corpus.vectors())
    }

    /// Build from raw rows (one vector per row, all of equal length).
    ///
    /// # Errors
    ///
    /// - `InsufficientData` for fewer than 2 rows
    /// - `DimensionMismatch` for a row whose length differs from row 0
    /// - `InvalidTier` for a zero-sized or non-nested tier configuration
    /// - `Decomposition` if the eigen-decomposition yields NaN
    pub fn build_from_vectors<V: AsRef<[f64]>>(&self, rows: &[V]) -> BasisResult<Basis> {
        self.config.validate().map_err(BasisError::InvalidTier)?;

        let n = rows.len();
        if n < 2 {
            return Err(BasisError::InsufficientData {
                required: 2,
                actual: n,
            });
        }
        let d = rows[0].as_ref().len();
        if d == 0 {
            return Err(CoreError::validation("amplitudes", "vectors must not be empty").into());
        }
        for (row, v) in rows.iter().enumerate() {
            let v = v.as_ref();
            if v.len() != d {
                return Err(BasisError::DimensionMismatch {
                    row,
                    expected: d,
                    actual: v.len(),
                });
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(CoreError::validation(
                    "amplitudes",
                    format!("non-finite value in row {}", row),
                )
                .into());
            }
        }

        info!(corpus_size = n, dimension = d, cap = self.config.cap, "Building basis");

        let mut barycenter = vec![0.0; d];
        for v in rows {
            for (b, x) in barycenter.iter_mut().zip(v.as_ref()) {
                *b += x;
            }
        }
        for b in barycenter.iter_mut() {
            *b /= n as f64;
        }

        let x = DMatrix::from_fn(n, d, |i, j| rows[i].as_ref()[j] - barycenter[j]);
        let cov = (x.transpose() * &x) / (n as f64 - 1.0);

        let eigen = SymmetricEigen::new(cov);
        let raw = eigen.eigenvalues;
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(BasisError::Decomposition(
                "eigenvalues contain NaN or Infinity".to_string(),
            ));
        }
        debug!(
            dimension = d,
            max_eigenvalue = raw.iter().cloned().fold(f64::MIN, f64::max),
            "Eigen-decomposition complete"
        );

        // nalgebra does not sort eigenvalues.
        let mut order: Vec<usize> = (0..d).collect();
        order.sort_by(|&a, &b| raw[b].total_cmp(&raw[a]).then(a.cmp(&b)));

        let total: f64 = raw.iter().map(|v| v.max(0.0)).sum();
        let modes = d.min(n - 1).min(self.config.cap);

        let mut directions = Vec::with_capacity(modes);
        let mut eigenvalues = Vec::with_capacity(modes);
        for &idx in order.iter().take(modes) {
            let mut direction: Vec<f64> = eigen.eigenvectors.column(idx).iter().copied().collect();
            normalize(&mut direction);
            canonicalize_sign(&mut direction);
            directions.push(direction);
            eigenvalues.push(raw[idx].max(0.0));
        }

        let cumulative_variance = cumulative_variance(&eigenvalues, total);
        let tiers = TierBoundaries::resolve(&self.config.tiers, modes)?;
        let fingerprint =
            Fingerprint::compute(&barycenter, directions.iter().map(Vec::as_slice));

        let basis = Basis {
            barycenter,
            directions,
            eigenvalues,
            cumulative_variance,
            fingerprint,
            tiers,
            corpus_size: n,
            computed_at: Utc::now(),
        };

        info!(
            basis_hash = %basis.basis_hash(),
            modes,
            coarse_variance = basis.variance_captured(basis.tier_size(Tier::Coarse)),
            standard_variance = basis.variance_captured(basis.tier_size(Tier::Standard)),
            full_variance = basis.variance_captured(basis.tier_size(Tier::Full)),
            "Basis built"
        );
        Ok(basis)
    }
}

fn normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Make the largest-magnitude component (first on ties) positive.
pub(crate) fn canonicalize_sign(v: &mut [f64]) {
    let mut pivot = 0;
    for (i, x) in v.iter().enumerate() {
        if x.abs() > v[pivot].abs() {
            pivot = i;
        }
    }
    if v.get(pivot).is_some_and(|x| *x < 0.0) {
        v.iter_mut().for_each(|x| *x = -*x);
    }
}

/// Running share of `total`, clamped to [0, 1] and non-decreasing.
pub(crate) fn cumulative_variance(eigenvalues: &[f64], total: f64) -> Vec<f64> {
    if total <= 0.0 {
        return vec![1.0; eigenvalues.len()];
    }
    let mut running = 0.0;
    let mut prev = 0.0_f64;
    eigenvalues
        .iter()
        .map(|ev| {
            running += ev;
            prev = (running / total).clamp(0.0, 1.0).max(prev);
            prev
        })
        .collect()
}
