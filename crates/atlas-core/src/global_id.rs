//! # Global Identifier Layout
//!
//! A `GlobalId` is the one handle an asset carries across every registry
//! module. Its 128 bits are split so that the owning module and its local
//! index can be read back without a lookup table:
//!
//! ```text
//!  127      120 119      112 111      104 103       96 95               64 63                 0
//! ┌──────────┬──────────┬──────────┬──────────┬───────────────────┬────────────────────┐
//! │  magic   │ chain id │ class tag│ reserved │   module index    │    local index     │
//! └──────────┴──────────┴──────────┴──────────┴───────────────────┴────────────────────┘
//! ```
//!
//! This module only composes and splits the bits. Whether a given
//! identifier belongs to a registered module is the encoder's decision.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::strip_hex_prefix;
use crate::error::CodecError;

/// Marker byte in the top 8 bits of every identifier.
pub const GLOBAL_ID_MAGIC: u8 = 0x2a;

const CHAIN_SHIFT: u32 = 112;
const CLASS_SHIFT: u32 = 104;
const RESERVED_SHIFT: u32 = 96;
const MODULE_SHIFT: u32 = 64;
const MAGIC_SHIFT: u32 = 120;

/// Category of asset a module issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassTag(pub u8);

/// Class of modules that only track ownership and issue no objects.
pub const LEDGER_CLASS: ClassTag = ClassTag(0);

/// Class of coordinate-addressed land parcels.
pub const LAND_CLASS: ClassTag = ClassTag(1);

impl std::fmt::Display for ClassTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "class:{}", self.0)
    }
}

/// Position of a module in the encoder's registration table, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleIndex(pub u32);

impl std::fmt::Display for ModuleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "module:{}", self.0)
    }
}

/// The fields of a [`GlobalId`], unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalIdParts {
    /// Top byte; [`GLOBAL_ID_MAGIC`] in well-formed identifiers.
    pub magic: u8,
    /// Chain the identifier was minted on.
    pub chain_id: u8,
    /// Class tag of the issuing module.
    pub class_tag: ClassTag,
    /// Reserved byte; zero in well-formed identifiers.
    pub reserved: u8,
    /// Registration index of the issuing module.
    pub module_index: ModuleIndex,
    /// Index local to the issuing module.
    pub local_index: u64,
}

impl GlobalIdParts {
    /// Magic, chain and reserved bytes all hold their expected values.
    pub fn is_well_formed(&self, chain_id: u8) -> bool {
        self.magic == GLOBAL_ID_MAGIC && self.chain_id == chain_id && self.reserved == 0
    }
}

/// Cross-module asset identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalId(u128);

impl GlobalId {
    /// Assemble an identifier from its fields.
    pub fn compose(
        chain_id: u8,
        class_tag: ClassTag,
        module_index: ModuleIndex,
        local_index: u64,
    ) -> Self {
        Self(
            (u128::from(GLOBAL_ID_MAGIC) << MAGIC_SHIFT)
                | (u128::from(chain_id) << CHAIN_SHIFT)
                | (u128::from(class_tag.0) << CLASS_SHIFT)
                | (u128::from(module_index.0) << MODULE_SHIFT)
                | u128::from(local_index),
        )
    }

    /// Wrap a raw value without checking it.
    pub fn from_u128(raw: u128) -> Self {
        Self(raw)
    }

    /// Raw 128-bit value.
    pub fn as_u128(&self) -> u128 {
        self.0
    }

    /// Split into fields.
    pub fn parts(&self) -> GlobalIdParts {
        GlobalIdParts {
            magic: (self.0 >> MAGIC_SHIFT) as u8,
            chain_id: (self.0 >> CHAIN_SHIFT) as u8,
            class_tag: ClassTag((self.0 >> CLASS_SHIFT) as u8),
            reserved: (self.0 >> RESERVED_SHIFT) as u8,
            module_index: ModuleIndex((self.0 >> MODULE_SHIFT) as u32),
            local_index: self.0 as u64,
        }
    }

    /// Parse a `0x`-prefixed (or bare) hex string of up to 32 digits.
    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        let hex = strip_hex_prefix(hex.trim());
        if hex.is_empty() || hex.len() > 32 {
            return Err(CodecError::InvalidGlobalId(format!(
                "expected 1..=32 hex digits, got {}",
                hex.len()
            )));
        }
        u128::from_str_radix(hex, 16)
            .map(Self)
            .map_err(|e| CodecError::InvalidGlobalId(e.to_string()))
    }
}

impl std::str::FromStr for GlobalId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl std::fmt::Display for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:032x}", self.0)
    }
}

impl std::fmt::Debug for GlobalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GlobalId({self})")
    }
}

impl Serialize for GlobalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GlobalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_compose_places_fields() {
        let id = GlobalId::compose(1, LAND_CLASS, ModuleIndex(2), 0x1234);
        assert_eq!(id.to_string(), "0x2a010100000000020000000000001234");
        let parts = id.parts();
        assert_eq!(parts.magic, GLOBAL_ID_MAGIC);
        assert_eq!(parts.chain_id, 1);
        assert_eq!(parts.class_tag, LAND_CLASS);
        assert_eq!(parts.reserved, 0);
        assert_eq!(parts.module_index, ModuleIndex(2));
        assert_eq!(parts.local_index, 0x1234);
        assert!(parts.is_well_formed(1));
        assert!(!parts.is_well_formed(2));
    }

    #[test]
    fn test_reserved_bits_detected() {
        let id = GlobalId::compose(1, LAND_CLASS, ModuleIndex(1), 7);
        let tampered = GlobalId::from_u128(id.as_u128() | (1u128 << 100));
        assert!(!tampered.parts().is_well_formed(1));
    }

    #[test]
    fn test_hex_parse() {
        let id = GlobalId::compose(1, LEDGER_CLASS, ModuleIndex(9), u64::MAX);
        assert_eq!(id.to_string().parse::<GlobalId>().unwrap(), id);
        assert!(GlobalId::from_hex("").is_err());
        assert!(GlobalId::from_hex("0xnothex").is_err());
        assert!(GlobalId::from_hex(&format!("0x{}", "f".repeat(33))).is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let id = GlobalId::compose(1, LAND_CLASS, ModuleIndex(1), 42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        assert_eq!(serde_json::from_str::<GlobalId>(&json).unwrap(), id);
    }

    proptest! {
        /// parts() recovers exactly what compose() was given.
        #[test]
        fn compose_split_roundtrip(
            chain in any::<u8>(),
            class in any::<u8>(),
            module in any::<u32>(),
            local in any::<u64>(),
        ) {
            let parts = GlobalId::compose(chain, ClassTag(class), ModuleIndex(module), local).parts();
            prop_assert_eq!(parts.chain_id, chain);
            prop_assert_eq!(parts.class_tag, ClassTag(class));
            prop_assert_eq!(parts.module_index, ModuleIndex(module));
            prop_assert_eq!(parts.local_index, local);
            prop_assert_eq!(parts.reserved, 0);
        }
    }
}
