//! Configuration management for the connectome engine.
//!
//! Every fixed constant of the basis builder, the delta codec and the shimmer
//! scorers lives here as a configurable value with the reference default.

mod sub_configs;


use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub use sub_configs::{
    BasisConfig, CodecConfig, CorpusConfig, LoggingConfig, ResonanceConfig, ShimmerConfig,
    TagConfig, TierConfig,
};

/// Environment variable selecting the environment-specific config file.
pub const ENV_SELECTOR: &str = "CONNECTOME_ENV";

/// Prefix for environment variable overrides (`CONNECTOME__CODEC__SPARSE_THRESHOLD=0.002`).
pub const ENV_PREFIX: &str = "CONNECTOME";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub tags: TagConfig,
    #[serde(default)]
    pub basis: BasisConfig,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub shimmer: ShimmerConfig,
    #[serde(default)]
    pub resonance: ResonanceConfig,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{CONNECTOME_ENV}.toml (environment-specific)
    /// 3. Environment variables with CONNECTOME__ prefix
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var(ENV_SELECTOR).unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every subsystem configuration.
    pub fn validate(&self) -> CoreResult<()> {
        self.logging.validate().map_err(CoreError::ConfigError)?;
        self.corpus.validate().map_err(CoreError::ConfigError)?;
        self.tags.validate().map_err(CoreError::ConfigError)?;
        self.basis.validate().map_err(CoreError::ConfigError)?;
        self.codec.validate().map_err(CoreError::ConfigError)?;
        self.shimmer.validate().map_err(CoreError::ConfigError)?;
        self.resonance.validate().map_err(CoreError::ConfigError)?;

        if self.corpus.dimension > 256 {
            tracing::warn!(
                dimension = self.corpus.dimension,
                "Sparse delta records address at most 256 dimensions; only projected mode will work"
            );
        }
        Ok(())
    }
}
