//! Composite shimmer over the four sibling metrics.

use serde::{Deserialize, Serialize};

use crate::error::{ShimmerError, ShimmerResult};

const MIN_RANGE: f64 = 1e-15;

/// Scale to `[0, 1]`; a (near-)constant input maps to all zeros.
pub fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = hi - lo;
    if values.is_empty() || range < MIN_RANGE {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - lo) / range).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// Mean of the four normalized metrics.
    pub arithmetic: f64,
    /// Fourth root of their product; 0 unless every metric is positive.
    pub geometric: f64,
}

/// Combine S1, S2b, S3 and S5, each normalized across the corpus first.
///
/// # Errors
///
/// `LengthMismatch` when the metric vectors differ in length.
pub fn composite(
    s1: &[f64],
    s2b: &[f64],
    s3: &[f64],
    s5: &[f64],
) -> ShimmerResult<Vec<CompositeScore>> {
    let n = s1.len();
    ShimmerError::check_len("s2b", n, s2b.len())?;
    ShimmerError::check_len("s3", n, s3.len())?;
    ShimmerError::check_len("s5", n, s5.len())?;

    let metrics = [
        min_max_normalize(s1),
        min_max_normalize(s2b),
        min_max_normalize(s3),
        min_max_normalize(s5),
    ];
    Ok((0..n)
        .map(|i| {
            let values = metrics.iter().map(|m| m[i]);
            let arithmetic = values.clone().sum::<f64>() / 4.0;
            let geometric = if values.clone().all(|v| v > 0.0) {
                values.product::<f64>().powf(0.25)
            } else {
                0.0
            };
            CompositeScore {
                arithmetic,
                geometric,
            }
        })
        .collect())
}
