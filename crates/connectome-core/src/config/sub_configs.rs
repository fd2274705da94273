//! Sub-configuration types for each subsystem.

use serde::{Deserialize, Serialize};

/// Logging configuration consumed by [`crate::logging::init_tracing`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive (`RUST_LOG` takes precedence when set).
    pub level: String,
    /// Output format: `pretty`, `compact` or `json`.
    pub format: String,
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), String> {
        match self.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(format!(
                    "logging.format must be one of pretty|compact|json, got {}",
                    other
                ))
            }
        }
        if self.level.trim().is_empty() {
            return Err("logging.level must not be empty".to_string());
        }
        Ok(())
    }
}

/// Corpus shape settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Feature vector dimension D shared by every entity.
    pub dimension: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dimension: 200,
        }
    }
}

impl CorpusConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.dimension == 0 {
            return Err("corpus.dimension must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Reserved tag patterns that mark system (non-semantic) tags.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TagConfig {
    /// A tag starting with any of these is a system tag.
    pub system_prefixes: Vec<String>,
    /// A tag equal to any of these is a system tag.
    pub system_exact: Vec<String>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            system_prefixes: [
                "#embed:",
                "#dna:",
                "#synthesis:",
                "#source:",
                "#calibration",
                "#public",
                "#tier:",
                "#P-series",
                "#golden_connectome",
                "#invariance",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            system_exact: Vec::new(),
        }
    }
}

impl TagConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(empty) = self
            .system_prefixes
            .iter()
            .chain(self.system_exact.iter())
            .find(|p| p.is_empty())
        {
            return Err(format!(
                "tags: empty system pattern {:?} would classify every tag as system",
                empty
            ));
        }
        Ok(())
    }
}

/// Tier sizes: nested prefixes over the ordered principal directions.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct TierConfig {
    pub coarse: usize,
    pub standard: usize,
    pub full: usize,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            coarse: 32,
            standard: 100,
            full: 130,
        }
    }
}

impl TierConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.coarse == 0 {
            return Err("basis.tiers.coarse must be greater than 0".to_string());
        }
        if !(self.coarse <= self.standard && self.standard <= self.full) {
            return Err(format!(
                "basis.tiers must be nested (coarse <= standard <= full), got {}/{}/{}",
                self.coarse, self.standard, self.full
            ));
        }
        if self.full > u8::MAX as usize {
            return Err(format!(
                "basis.tiers.full must fit a single-byte entry count (<= 255), got {}",
                self.full
            ));
        }
        Ok(())
    }
}

/// Basis builder settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasisConfig {
    /// Maximum number of retained principal directions (CAP).
    pub cap: usize,
    pub tiers: TierConfig,
}

impl Default for BasisConfig {
    fn default() -> Self {
        Self {
            cap: 130,
            tiers: TierConfig::default(),
        }
    }
}

impl BasisConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.tiers.validate()?;
        if self.cap < self.tiers.full {
            return Err(format!(
                "basis.cap ({}) must cover the full tier ({})",
                self.cap, self.tiers.full
            ));
        }
        Ok(())
    }
}

/// Delta codec constants.
///
/// The defaults are the reference constants; they are not derived from data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Sparse mode encodes dimensions where |delta| exceeds this value.
    pub sparse_threshold: f64,
    /// Scale for sparse amplitude deltas (stored as i16).
    pub amplitude_scale: f64,
    /// Scale for projected-mode coefficients (stored as i16).
    pub coefficient_scale: f64,
    /// Scale for the coherence delta (stored as i8).
    pub coherence_scale: f64,
    /// Scale for the energy delta (stored as i8).
    pub energy_scale: f64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            sparse_threshold: 0.001,
            amplitude_scale: 1000.0,
            coefficient_scale: 10000.0,
            coherence_scale: 127.0,
            energy_scale: 127.0,
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.sparse_threshold.is_finite() || self.sparse_threshold < 0.0 {
            return Err(format!(
                "codec.sparse_threshold must be finite and >= 0, got {}",
                self.sparse_threshold
            ));
        }
        for (name, value) in [
            ("amplitude_scale", self.amplitude_scale),
            ("coefficient_scale", self.coefficient_scale),
            ("coherence_scale", self.coherence_scale),
            ("energy_scale", self.energy_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("codec.{} must be finite and > 0, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Shimmer scoring settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShimmerConfig {
    /// Neighborhood size for boundary (S5) scoring.
    pub boundary_k: usize,
    /// Neighborhood size for the coherence peak (S2b) metric.
    pub peak_k: usize,
    /// Rows per block when callers materialise the similarity matrix.
    pub block_rows: usize,
}

impl Default for ShimmerConfig {
    fn default() -> Self {
        Self {
            boundary_k: 20,
            peak_k: 10,
            block_rows: 256,
        }
    }
}

impl ShimmerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.boundary_k == 0 {
            return Err("shimmer.boundary_k must be > 0".to_string());
        }
        if self.peak_k == 0 {
            return Err("shimmer.peak_k must be > 0".to_string());
        }
        if self.block_rows == 0 {
            return Err("shimmer.block_rows must be > 0".to_string());
        }
        Ok(())
    }
}

/// Resonance (rational-approximation) score settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResonanceConfig {
    /// Leading principal directions used for the projection.
    pub n_components: usize,
    /// Largest denominator tried in the rational approximation.
    pub max_denominator: u32,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            n_components: 10,
            max_denominator: 50,
        }
    }
}

impl ResonanceConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_components == 0 {
            return Err("resonance.n_components must be > 0".to_string());
        }
        if self.max_denominator == 0 {
            return Err("resonance.max_denominator must be > 0".to_string());
        }
        Ok(())
    }
}
