//! Tiers: nested prefixes of the ordered principal directions.

use connectome_core::config::TierConfig;
use serde::{Deserialize, Serialize};

use crate::error::{BasisError, BasisResult};

/// Fidelity tier of a projected encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Coarse,
    Standard,
    Full,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Coarse, Tier::Standard, Tier::Full];

    /// 1-based tier number used in artifacts and indexes.
    pub fn number(self) -> u8 {
        match self {
            Tier::Coarse => 1,
            Tier::Standard => 2,
            Tier::Full => 3,
        }
    }
}

/// Effective tier sizes for one basis: `min(configured, M)` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBoundaries {
    pub coarse: usize,
    pub standard: usize,
    pub full: usize,
}

impl TierBoundaries {
    /// Clamp configured sizes to the number of retained directions.
    pub fn resolve(config: &TierConfig, modes: usize) -> BasisResult<Self> {
        validate_tiers(config)?;
        Ok(Self {
            coarse: config.coarse.min(modes),
            standard: config.standard.min(modes),
            full: config.full.min(modes),
        })
    }

    pub fn size(&self, tier: Tier) -> usize {
        match tier {
            Tier::Coarse => self.coarse,
            Tier::Standard => self.standard,
            Tier::Full => self.full,
        }
    }

    /// Boundaries must be nested and within `modes`.
    pub(crate) fn check(&self, modes: usize) -> BasisResult<()> {
        if !(self.coarse <= self.standard && self.standard <= self.full && self.full <= modes) {
            return Err(BasisError::InvalidArtifact(format!(
                "tier markers {}/{}/{} not nested within {} modes",
                self.coarse, self.standard, self.full, modes
            )));
        }
        Ok(())
    }
}

pub(crate) fn validate_tiers(config: &TierConfig) -> BasisResult<()> {
    config.validate().map_err(BasisError::InvalidTier)
}
