//! # Parcel Flags
//!
//! Three marker bits kept next to a parcel's production rates:
//!
//! | Bit | Flag       | Meaning                                      |
//! |-----|------------|----------------------------------------------|
//! | 0   | `RESERVED` | held back from sale                          |
//! | 1   | `SPECIAL`  | landmark parcel, handled outside auctions    |
//! | 2   | `HAS_BOX`  | carries a treasure box                       |
//!
//! Bits 3..8 are undefined and rejected on parse.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Marker flags of one land parcel.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct LandFlags(u8);

impl LandFlags {
    /// Held back from sale.
    pub const RESERVED: Self = Self(1);
    /// Landmark parcel.
    pub const SPECIAL: Self = Self(1 << 1);
    /// Carries a treasure box.
    pub const HAS_BOX: Self = Self(1 << 2);

    const ALL_BITS: u8 = 0b111;

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Parse raw bits, rejecting undefined ones.
    pub fn from_bits(bits: u8) -> Result<Self, CodecError> {
        if bits & !Self::ALL_BITS != 0 {
            return Err(CodecError::UnknownFlags(bits));
        }
        Ok(Self(bits))
    }

    /// Raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Reserved or special parcels are kept out of general sale.
    pub fn is_withheld(self) -> bool {
        self.0 & (Self::RESERVED.0 | Self::SPECIAL.0) != 0
    }
}

impl std::ops::BitOr for LandFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl TryFrom<u8> for LandFlags {
    type Error = CodecError;

    fn try_from(bits: u8) -> Result<Self, CodecError> {
        Self::from_bits(bits)
    }
}

impl From<LandFlags> for u8 {
    fn from(flags: LandFlags) -> u8 {
        flags.0
    }
}

impl std::fmt::Display for LandFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = [
            (Self::RESERVED, "reserved"),
            (Self::SPECIAL, "special"),
            (Self::HAS_BOX, "has-box"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("|"))
        }
    }
}
