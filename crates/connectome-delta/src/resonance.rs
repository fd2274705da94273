//! Rational-approximation resonance.
//!
//! Each entity's leading projection coefficients are min-max scaled across
//! the corpus, then scored by how well small-denominator fractions
//! approximate them. Values close to simple ratios score near 1.

use connectome_core::config::ResonanceConfig;
use connectome_core::Corpus;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::basis::Basis;
use crate::error::{BasisError, BasisResult};

/// Components below this magnitude are skipped.
const ZERO_EPS: f64 = 1e-12;

/// Dirichlet-style irrationality of `x`: `min_q |x - round(x q)/q| q²`
/// over `q` in `1..=max_denominator`.
pub fn irrationality(x: f64, max_denominator: u32) -> f64 {
    (1..=max_denominator)
        .map(|q| {
            let q = f64::from(q);
            let p = (x * q).round();
            (x - p / q).abs() * q * q
        })
        .fold(f64::INFINITY, f64::min)
}

/// Score one row of normalized components, in `(0, 1]`.
pub fn resonance(components: &[f64], max_denominator: u32) -> f64 {
    if components.is_empty() {
        return 1.0;
    }
    let total: f64 = components
        .iter()
        .filter(|x| x.abs() >= ZERO_EPS)
        .map(|&x| irrationality(x, max_denominator))
        .sum();
    1.0 / (1.0 + total / components.len() as f64)
}

/// Resonance of every entity, in corpus order.
///
/// Uses the first `min(n_components, M)` directions.
///
/// # Errors
///
/// `DimensionMismatch` when the corpus and basis dimensions differ.
#[instrument(skip_all, fields(entities = corpus.len()))]
pub fn resonance_scores(
    corpus: &Corpus,
    basis: &Basis,
    config: &ResonanceConfig,
) -> BasisResult<Vec<f64>> {
    if corpus.dimension() != basis.dimension() {
        return Err(BasisError::DimensionMismatch {
            row: 0,
            expected: basis.dimension(),
            actual: corpus.dimension(),
        });
    }
    let modes = config.n_components.min(basis.mode_count());

    let projections: Vec<Vec<f64>> = corpus
        .entities()
        .par_iter()
        .map(|e| basis.project_unchecked(e.vector().as_slice(), modes))
        .collect();
    let normalized = min_max_columns(projections, modes);

    let scores: Vec<f64> = normalized
        .par_iter()
        .map(|row| resonance(row, config.max_denominator))
        .collect();
    debug!(modes, "Computed resonance scores");
    Ok(scores)
}

/// Scale every column to `[0, 1]`; a constant column divides by 1.
fn min_max_columns(mut rows: Vec<Vec<f64>>, columns: usize) -> Vec<Vec<f64>> {
    for j in 0..columns {
        let (lo, hi) = rows
            .iter()
            .map(|r| r[j])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let range = if hi - lo > 0.0 { hi - lo } else { 1.0 };
        for row in &mut rows {
            row[j] = (row[j] - lo) / range;
        }
    }
    rows
}
