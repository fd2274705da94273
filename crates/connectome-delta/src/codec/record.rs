//! Delta record wire format.
//!
//! ```text
//! [4 fragment u32 LE][1 type][1 baseline][1 count]
//! [count × (1 index + 2 value i16 LE)]
//! [1 coherence i8][1 energy i8][1 checksum]
//! ```
//!
//! Length is always `7 + 3 × count + 3`.

use serde::{Deserialize, Serialize};

use super::checksum::xor_fold;
use crate::error::{CodecResult, DecodeError, EncodeError, IntegrityError};

pub const HEADER_LEN: usize = 7;
pub const ENTRY_LEN: usize = 3;
/// Coherence, energy and checksum bytes.
pub const TRAILER_LEN: usize = 3;
pub const MIN_RECORD_LEN: usize = HEADER_LEN + TRAILER_LEN;
/// The entry count is a single byte.
pub const MAX_ENTRIES: usize = u8::MAX as usize;

/// Type-code bit marking a projected-mode record.
pub const PROJECTED_FLAG: u8 = 0x80;

/// Layer code, stored in the low nibble of the type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LayerCode {
    L1Math = 0x00,
    L2Genesis = 0x01,
    L3PFrame = 0x02,
    TierReference = 0x03,
    TierConvergence = 0x04,
    TierMeta = 0x05,
}

impl LayerCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::L1Math),
            0x01 => Some(Self::L2Genesis),
            0x02 => Some(Self::L3PFrame),
            0x03 => Some(Self::TierReference),
            0x04 => Some(Self::TierConvergence),
            0x05 => Some(Self::TierMeta),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodingMode {
    /// Entries are `(dimension, amplitude delta)` against a baseline vector.
    Sparse,
    /// Entries are `(direction, coefficient)` against the basis barycenter.
    Projected,
}

/// Decoded type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeCode {
    pub layer: LayerCode,
    pub mode: EncodingMode,
}

impl TypeCode {
    pub fn new(layer: LayerCode, mode: EncodingMode) -> Self {
        Self { layer, mode }
    }

    pub fn to_byte(self) -> u8 {
        match self.mode {
            EncodingMode::Sparse => self.layer.as_u8(),
            EncodingMode::Projected => self.layer.as_u8() | PROJECTED_FLAG,
        }
    }

    /// Only the projected flag and a known layer code may be set.
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let mode = if byte & PROJECTED_FLAG != 0 {
            EncodingMode::Projected
        } else {
            EncodingMode::Sparse
        };
        let layer =
            LayerCode::from_u8(byte & !PROJECTED_FLAG).ok_or(DecodeError::UnknownTypeCode(byte))?;
        Ok(Self { layer, mode })
    }
}

/// Baseline reference byte.
///
/// `0x00..=0x07` name calibration anchors; [`BaselineRef::BARYCENTER`] names
/// the basis barycenter. Other values are passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaselineRef(pub u8);

impl BaselineRef {
    pub const BARYCENTER: BaselineRef = BaselineRef(0xFF);
    pub const MAX_ANCHOR: u8 = 0x07;

    pub fn is_anchor(self) -> bool {
        self.0 <= Self::MAX_ANCHOR
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaEntry {
    /// Dimension (sparse) or direction (projected).
    pub index: u8,
    pub value: i16,
}

/// A parsed or about-to-be-written delta record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaRecord {
    pub fragment: u32,
    pub type_code: TypeCode,
    pub baseline: BaselineRef,
    pub entries: Vec<DeltaEntry>,
    pub coherence_delta: i8,
    pub energy_delta: i8,
}

impl DeltaRecord {
    /// Wire length for `count` entries.
    #[inline]
    pub const fn len_for(count: usize) -> usize {
        HEADER_LEN + ENTRY_LEN * count + TRAILER_LEN
    }

    #[inline]
    pub fn encoded_len(&self) -> usize {
        Self::len_for(self.entries.len())
    }

    #[inline]
    pub fn mode(&self) -> EncodingMode {
        self.type_code.mode
    }

    /// Serialize, appending the checksum byte.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when there are more than 255 entries.
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let count = self.entries.len();
        if count > MAX_ENTRIES {
            return Err(EncodeError::CapacityExceeded {
                count,
                max: MAX_ENTRIES,
            }
            .into());
        }

        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&self.fragment.to_le_bytes());
        bytes.push(self.type_code.to_byte());
        bytes.push(self.baseline.0);
        bytes.push(count as u8);
        for entry in &self.entries {
            bytes.push(entry.index);
            bytes.extend_from_slice(&entry.value.to_le_bytes());
        }
        bytes.push(self.coherence_delta as u8);
        bytes.push(self.energy_delta as u8);
        bytes.push(xor_fold(&bytes));

        debug_assert_eq!(bytes.len(), self.encoded_len());
        Ok(bytes)
    }

    /// Parse and integrity-check a record.
    ///
    /// Order of checks: minimum length, checksum (before anything else is
    /// interpreted), length implied by the count byte, type code.
    pub fn parse(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.len() < MIN_RECORD_LEN {
            return Err(DecodeError::Truncated {
                len: bytes.len(),
                min: MIN_RECORD_LEN,
            }
            .into());
        }

        let (body, stored) = bytes.split_at(bytes.len() - 1);
        let computed = xor_fold(body);
        if computed != stored[0] {
            return Err(IntegrityError::ChecksumMismatch {
                stored: stored[0],
                computed,
            }
            .into());
        }

        let count = bytes[6] as usize;
        let expected = Self::len_for(count);
        if bytes.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let fragment = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let type_code = TypeCode::from_byte(bytes[4])?;
        let baseline = BaselineRef(bytes[5]);

        let entries = bytes[HEADER_LEN..HEADER_LEN + ENTRY_LEN * count]
            .chunks_exact(ENTRY_LEN)
            .map(|c| DeltaEntry {
                index: c[0],
                value: i16::from_le_bytes([c[1], c[2]]),
            })
            .collect();

        let trailer = HEADER_LEN + ENTRY_LEN * count;
        Ok(Self {
            fragment,
            type_code,
            baseline,
            entries,
            coherence_delta: bytes[trailer] as i8,
            energy_delta: bytes[trailer + 1] as i8,
        })
    }
}
