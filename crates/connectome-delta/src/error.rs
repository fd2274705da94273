//! Error types for basis construction and the delta codec.
//!
//! Two families, both with stable codes:
//! - [`BasisError`] (`E_BASIS_xxx`) for building and loading a basis
//! - [`CodecError`] (`E_CODEC_xxx`) for encoding and decoding delta records
//!
//! Every error is terminal for the call that produced it. Nothing is retried
//! internally; [`is_recoverable`](CodecError::is_recoverable) tells callers
//! whether trying again with different parameters (another tier, projected
//! instead of sparse mode, the matching basis) can succeed.

use connectome_core::CoreError;
use thiserror::Error;

/// Errors raised while building, validating or loading a [`crate::Basis`].
#[derive(Debug, Error)]
pub enum BasisError {
    /// Fewer than two vectors; covariance is undefined.
    #[error("E_BASIS_001: Insufficient data: need at least {required} vectors, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// A row does not have the dimension of the first row.
    #[error("E_BASIS_002: Dimension mismatch at row {row}: expected {expected}, got {actual}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Tier sizes are zero or not nested.
    #[error("E_BASIS_003: Invalid tier configuration: {0}")]
    InvalidTier(String),

    /// Artifact shapes or invariants are violated.
    #[error("E_BASIS_004: Invalid basis artifact: {0}")]
    InvalidArtifact(String),

    /// The stored `basis_hash` does not match the recomputed fingerprint.
    #[error("E_BASIS_005: Fingerprint mismatch: stored {stored}, computed {computed}")]
    FingerprintMismatch { stored: String, computed: String },

    /// The eigen-decomposition produced unusable output (NaN).
    #[error("E_BASIS_006: Decomposition failed: {0}")]
    Decomposition(String),

    #[error("E_BASIS_007: {0}")]
    Core(#[from] CoreError),
}

impl BasisError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData { .. } => "E_BASIS_001",
            Self::DimensionMismatch { .. } => "E_BASIS_002",
            Self::InvalidTier(_) => "E_BASIS_003",
            Self::InvalidArtifact(_) => "E_BASIS_004",
            Self::FingerprintMismatch { .. } => "E_BASIS_005",
            Self::Decomposition(_) => "E_BASIS_006",
            Self::Core(_) => "E_BASIS_007",
        }
    }

    /// A different tier configuration can make the same call succeed.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidTier(_))
    }
}

impl From<serde_json::Error> for BasisError {
    fn from(err: serde_json::Error) -> Self {
        BasisError::InvalidArtifact(err.to_string())
    }
}

pub type BasisResult<T> = Result<T, BasisError>;

/// Encode-side failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    /// More entries than the single-byte count can carry.
    #[error("E_CODEC_001: Capacity exceeded: {count} entries, maximum is {max}")]
    CapacityExceeded { count: usize, max: usize },

    #[error("E_CODEC_002: Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Sparse indices are one byte, so at most 256 dimensions are addressable.
    #[error("E_CODEC_003: Dimension {dimension} too large for sparse mode (max {max})")]
    DimensionTooLarge { dimension: usize, max: usize },

    #[error("E_CODEC_004: Tier needs {requested} directions, basis has {available}")]
    TierOutOfRange { requested: usize, available: usize },

    #[error("E_CODEC_005: Non-finite value in {field}")]
    NonFiniteValue { field: &'static str },
}

/// Structural decode failures (after the checksum passed).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("E_CODEC_010: Record truncated: {len} bytes, minimum is {min}")]
    Truncated { len: usize, min: usize },

    #[error("E_CODEC_011: Record length mismatch: header implies {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("E_CODEC_012: Entry index {index} out of range (limit {limit})")]
    IndexOutOfRange { index: usize, limit: usize },

    #[error("E_CODEC_013: Unknown type code {0:#04x}")]
    UnknownTypeCode(u8),

    #[error("E_CODEC_014: Projected record requires a basis")]
    MissingBasis,
}

/// The trailing checksum byte disagrees with the recomputed XOR fold.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntegrityError {
    #[error("E_CODEC_020: Checksum mismatch: stored {stored:#04x}, computed {computed:#04x}")]
    ChecksumMismatch { stored: u8, computed: u8 },
}

/// Top-level codec error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Projected record was encoded against a different basis.
    #[error("E_CODEC_030: Basis mismatch: record fragment {record:#010x}, basis fragment {basis:#010x}")]
    BasisMismatch { record: u32, basis: u32 },
}

impl CodecError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Encode(e) => match e {
                EncodeError::CapacityExceeded { .. } => "E_CODEC_001",
                EncodeError::DimensionMismatch { .. } => "E_CODEC_002",
                EncodeError::DimensionTooLarge { .. } => "E_CODEC_003",
                EncodeError::TierOutOfRange { .. } => "E_CODEC_004",
                EncodeError::NonFiniteValue { .. } => "E_CODEC_005",
            },
            Self::Decode(e) => match e {
                DecodeError::Truncated { .. } => "E_CODEC_010",
                DecodeError::LengthMismatch { .. } => "E_CODEC_011",
                DecodeError::IndexOutOfRange { .. } => "E_CODEC_012",
                DecodeError::UnknownTypeCode(_) => "E_CODEC_013",
                DecodeError::MissingBasis => "E_CODEC_014",
            },
            Self::Integrity(_) => "E_CODEC_020",
            Self::BasisMismatch { .. } => "E_CODEC_030",
        }
    }

    /// Retrying with other parameters can succeed: a lower tier, projected
    /// mode instead of sparse, or the basis the record was encoded against.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Encode(EncodeError::CapacityExceeded { .. })
                | Self::Encode(EncodeError::DimensionTooLarge { .. })
                | Self::Encode(EncodeError::TierOutOfRange { .. })
                | Self::Decode(DecodeError::MissingBasis)
                | Self::BasisMismatch { .. }
        )
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
