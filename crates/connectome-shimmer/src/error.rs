//! Error types for connectome-shimmer.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShimmerError {
    /// Neighborhood size or another parameter is unusable for this corpus.
    ///
    /// `Constraint: 0 < k < corpus_size`
    #[error("E_SHIMMER_001: Configuration error: {0}")]
    ConfigurationError(String),

    #[error("E_SHIMMER_002: Entity index {index} out of bounds (corpus has {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("E_SHIMMER_003: Dimension mismatch at row {row}: expected {expected}, got {actual}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Per-entity inputs (coherence, tags, scores) disagree in length.
    #[error("E_SHIMMER_004: Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("E_SHIMMER_005: Corpus is empty")]
    EmptyCorpus,
}

impl ShimmerError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigurationError(_) => "E_SHIMMER_001",
            Self::IndexOutOfBounds { .. } => "E_SHIMMER_002",
            Self::DimensionMismatch { .. } => "E_SHIMMER_003",
            Self::LengthMismatch { .. } => "E_SHIMMER_004",
            Self::EmptyCorpus => "E_SHIMMER_005",
        }
    }

    /// A smaller neighborhood can succeed where this one failed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConfigurationError(_))
    }

    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> ShimmerResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::LengthMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}

pub type ShimmerResult<T> = Result<T, ShimmerError>;
