//! # Production Rates and the Attribute Packer
//!
//! Every land parcel produces five resources. Their rates are stored as a
//! single packed attribute word so external readers see one fixed numeric
//! value per parcel.
//!
//! ## Layout
//!
//! With slot width `W` (default 65536, i.e. 16 bits per rate):
//!
//! ```text
//! attribute = gold + wood·W + water·W² + fire·W³ + soil·W⁴
//! ```
//!
//! Packing validates each rate against `W` before combining, so the sum can
//! never overflow a `u128` once `W⁵ ≤ 2¹²⁸` holds (checked at construction).
//! Unpacking is total: bits above `W⁵` are ignored.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Number of resource kinds in a packed attribute.
pub const RESOURCE_KIND_COUNT: usize = 5;

/// Default per-rate slot width (16 bits).
pub const DEFAULT_RATE_WIDTH: u32 = 65_536;

/// The five produced resources, in packing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Base resource, slot 0.
    Gold,
    /// Elemental resource, slot 1.
    Wood,
    /// Elemental resource, slot 2.
    Water,
    /// Elemental resource, slot 3.
    Fire,
    /// Elemental resource, slot 4.
    Soil,
}

impl ResourceKind {
    /// All kinds in slot order.
    pub const ALL: [ResourceKind; RESOURCE_KIND_COUNT] =
        [Self::Gold, Self::Wood, Self::Water, Self::Fire, Self::Soil];

    /// Slot position inside the packed attribute.
    pub fn slot(&self) -> usize {
        match self {
            Self::Gold => 0,
            Self::Wood => 1,
            Self::Water => 2,
            Self::Fire => 3,
            Self::Soil => 4,
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Wood => "wood",
            Self::Water => "water",
            Self::Fire => "fire",
            Self::Soil => "soil",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown resource kind: {s:?}"))
    }
}

/// Structured form of a packed attribute: one rate per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProductionRates([u32; RESOURCE_KIND_COUNT]);

impl ProductionRates {
    /// Rates in slot order: gold, wood, water, fire, soil.
    pub fn new(gold: u32, wood: u32, water: u32, fire: u32, soil: u32) -> Self {
        Self([gold, wood, water, fire, soil])
    }

    /// Build from an array in slot order.
    pub fn from_array(rates: [u32; RESOURCE_KIND_COUNT]) -> Self {
        Self(rates)
    }

    /// Rates in slot order.
    pub fn as_array(&self) -> [u32; RESOURCE_KIND_COUNT] {
        self.0
    }

    /// Rate for one resource.
    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.0[kind.slot()]
    }

    /// Replace the rate for one resource.
    pub fn set(&mut self, kind: ResourceKind, rate: u32) {
        self.0[kind.slot()] = rate;
    }

    /// Iterate `(kind, rate)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        ResourceKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

impl std::ops::Index<ResourceKind> for ProductionRates {
    type Output = u32;

    fn index(&self, kind: ResourceKind) -> &u32 {
        &self.0[kind.slot()]
    }
}

/// Packs and unpacks [`ProductionRates`] for a fixed slot width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePacker {
    width: u32,
}

impl Default for AttributePacker {
    fn default() -> Self {
        Self {
            width: DEFAULT_RATE_WIDTH,
        }
    }
}

impl AttributePacker {
    /// Build a packer with slot width `width`.
    ///
    /// Requires `width >= 2` and `width^5` to fit in a `u128`.
    pub fn new(width: u32) -> Result<Self, CodecError> {
        if width < 2 {
            return Err(CodecError::InvalidParameters(format!(
                "rate width must be at least 2, got {width}"
            )));
        }
        if u128::from(width).checked_pow(RESOURCE_KIND_COUNT as u32).is_none() {
            return Err(CodecError::InvalidParameters(format!(
                "rate width {width} overflows a 128-bit attribute across {RESOURCE_KIND_COUNT} slots"
            )));
        }
        Ok(Self { width })
    }

    /// Exclusive upper bound for every rate.
    pub fn width(&self) -> u32 {
        self.width
    }

    fn place(&self, kind: ResourceKind) -> u128 {
        // Bounded by width^4, validated in `new`.
        u128::from(self.width).pow(kind.slot() as u32)
    }

    fn check(&self, kind: ResourceKind, rate: u32) -> Result<(), CodecError> {
        if rate >= self.width {
            return Err(CodecError::RateOutOfRange {
                kind,
                rate,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Pack five rates into one attribute word.
    pub fn pack(&self, rates: &ProductionRates) -> Result<u128, CodecError> {
        for (kind, rate) in rates.iter() {
            self.check(kind, rate)?;
        }
        Ok(rates
            .iter()
            .map(|(kind, rate)| u128::from(rate) * self.place(kind))
            .sum())
    }

    /// Unpack an attribute word. Never fails.
    pub fn unpack(&self, attribute: u128) -> ProductionRates {
        let mut rates = ProductionRates::default();
        for kind in ResourceKind::ALL {
            rates.set(kind, self.rate(attribute, kind));
        }
        rates
    }

    /// Read a single rate out of an attribute word.
    pub fn rate(&self, attribute: u128, kind: ResourceKind) -> u32 {
        let width = u128::from(self.width);
        // The remainder is below `width`, which is a u32.
        ((attribute / self.place(kind)) % width) as u32
    }

    /// Replace a single rate, leaving the other four slots untouched.
    pub fn with_rate(
        &self,
        attribute: u128,
        kind: ResourceKind,
        rate: u32,
    ) -> Result<u128, CodecError> {
        self.check(kind, rate)?;
        let mut rates = self.unpack(attribute);
        rates.set(kind, rate);
        self.pack(&rates)
    }
}
