//! Error types for connectome-core.
//!
//! This module defines the central error type [`CoreError`] used throughout
//! the connectome-core crate, along with the [`CoreResult<T>`] type alias.
//!
//! # Examples
//!
//! ```rust
//! use connectome_core::CoreError;
//!
//! let error = CoreError::DimensionMismatch {
//!     expected: 200,
//!     actual: 199,
//! };
//!
//! match &error {
//!     CoreError::DimensionMismatch { expected, actual } => {
//!         assert_eq!(*expected, 200);
//!         assert_eq!(*actual, 199);
//!     }
//!     _ => panic!("unexpected variant"),
//! }
//! assert!(error.to_string().contains("200"));
//! ```

use thiserror::Error;

/// Top-level error type for connectome-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Feature vector dimension does not match the corpus dimension.
    ///
    /// # When This Occurs
    ///
    /// - Inserting an entity whose amplitude count differs from the corpus D
    /// - Parsing a record with a truncated `amplitudes` array
    ///
    /// `Constraint: vector.len() == corpus.dimension()`
    #[error("E_CORE_001: Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension (the corpus dimension)
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// A field value failed validation constraints.
    ///
    /// # When This Occurs
    ///
    /// - Coherence outside `[0, 1]`
    /// - NaN or Infinity in amplitudes or energy
    /// - Empty entity id or empty vector
    #[error("E_CORE_002: Validation error: {field} - {message}")]
    ValidationError {
        /// Name of the field that failed validation
        field: String,
        /// Description of the validation failure
        message: String,
    },

    /// Configuration is invalid or could not be loaded.
    #[error("E_CORE_003: Configuration error: {0}")]
    ConfigError(String),

    /// Error during serialization or deserialization of records.
    #[error("E_CORE_004: Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DimensionMismatch { .. } => "E_CORE_001",
            Self::ValidationError { .. } => "E_CORE_002",
            Self::ConfigError(_) => "E_CORE_003",
            Self::SerializationError(_) => "E_CORE_004",
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::ConfigError(format!("Failed to parse config file: {}", err))
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
