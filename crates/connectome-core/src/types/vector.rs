//! Dense feature vector.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Immutable, non-empty sequence of finite `f64` amplitudes.
///
/// Serializes as a plain JSON array; deserialization runs the same validation
/// as [`FeatureVector::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    /// Create a vector, rejecting empty input and NaN/Infinity.
    ///
    /// # Errors
    ///
    /// `CoreError::ValidationError` naming the first offending index.
    pub fn new(values: Vec<f64>) -> CoreResult<Self> {
        if values.is_empty() {
            return Err(CoreError::validation(
                "amplitudes",
                "feature vector must not be empty",
            ));
        }
        if let Some((idx, v)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(CoreError::validation(
                "amplitudes",
                format!("non-finite value {} at index {}", v, idx),
            ));
        }
        Ok(Self(values))
    }

    /// A vector of `dimension` zeros.
    pub fn zeros(dimension: usize) -> CoreResult<Self> {
        Self::new(vec![0.0; dimension])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; construction rejects empty vectors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Dot product with a slice of the same length.
    pub fn dot(&self, other: &[f64]) -> CoreResult<f64> {
        self.check_len(other.len())?;
        Ok(self.0.iter().zip(other).map(|(a, b)| a * b).sum())
    }

    /// Element-wise `self - other`.
    pub fn delta_from(&self, other: &[f64]) -> CoreResult<Vec<f64>> {
        self.check_len(other.len())?;
        Ok(self.0.iter().zip(other).map(|(a, b)| a - b).collect())
    }

    /// Unit-length copy of the values; a zero vector stays zero.
    pub fn normalized(&self) -> Vec<f64> {
        let norm = self.norm();
        if norm > 0.0 {
            self.0.iter().map(|v| v / norm).collect()
        } else {
            self.0.clone()
        }
    }

    fn check_len(&self, actual: usize) -> CoreResult<()> {
        if actual != self.0.len() {
            return Err(CoreError::DimensionMismatch {
                expected: self.0.len(),
                actual,
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = CoreError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(v: FeatureVector) -> Self {
        v.0
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}
