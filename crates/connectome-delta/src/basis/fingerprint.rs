//! Content fingerprint of a basis.
//!
//! SHA-256 over the barycenter followed by every retained direction, all as
//! little-endian `f64`. The first 8 digest bytes form the 16-character hex
//! `basis_hash`; the first 4 bytes, read big-endian, are the fragment carried
//! in every delta record header.

use sha2::{Digest, Sha256};

/// Length of the rendered hash in hex characters.
pub const BASIS_HASH_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    hex: String,
    fragment: u32,
}

impl Fingerprint {
    pub fn compute<'a>(barycenter: &[f64], directions: impl IntoIterator<Item = &'a [f64]>) -> Self {
        let mut hasher = Sha256::new();
        for v in barycenter {
            hasher.update(v.to_le_bytes());
        }
        for direction in directions {
            for v in direction {
                hasher.update(v.to_le_bytes());
            }
        }
        let digest = hasher.finalize();

        let hex = format!("{:x}", digest)[..BASIS_HASH_LEN].to_string();
        let fragment = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
        Self { hex, fragment }
    }

    /// Rebuild from a stored hex hash. Returns `None` unless the input is
    /// exactly 16 hex digits.
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != BASIS_HASH_LEN || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let fragment = u32::from_str_radix(&hex[..8], 16).ok()?;
        Some(Self {
            hex: hex.to_ascii_lowercase(),
            fragment,
        })
    }

    /// 16 lowercase hex characters.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Header fragment: the first 8 hex digits as an integer.
    pub fn fragment(&self) -> u32 {
        self.fragment
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex)
    }
}
