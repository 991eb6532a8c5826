//! # Operation Selectors
//!
//! A selector names one gated operation. It is the first four bytes of
//! SHA-256 over the operation's canonical signature text, e.g.
//! `mintObject(address,uint128)`. Authorities grant and check permissions
//! per selector.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::address::{hex_to_bytes, strip_hex_prefix};
use crate::error::CodecError;

/// A 4-byte operation selector.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(pub [u8; 4]);

impl Selector {
    /// Compute the selector for a canonical signature string.
    pub fn of(signature: &str) -> Self {
        let digest = Sha256::digest(signature.as_bytes());
        Self([digest[0], digest[1], digest[2], digest[3]])
    }

    /// Create a selector from raw bytes.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Parse from 8 hex characters, optionally `0x`-prefixed.
    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        let hex = strip_hex_prefix(hex.trim());
        if hex.len() != 8 {
            return Err(CodecError::InvalidSelector(format!(
                "selector hex must be 8 chars, got {}",
                hex.len()
            )));
        }
        let bytes = hex_to_bytes(hex).map_err(CodecError::InvalidSelector)?;
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Selector({self})")
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}", u32::from_be_bytes(self.0))
    }
}
