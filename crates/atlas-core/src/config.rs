//! # Registry Configuration
//!
//! Deployment-specific geometry: coordinate bounds, rate slot width and the
//! chain id stamped into every global identifier. Loaded from YAML:
//!
//! ```yaml
//! x_bound: 112
//! y_bound: 30
//! rate_width: 65536
//! chain_id: 1
//! ```
//!
//! Any omitted field takes its default. `validate()` must pass before the
//! config is used to build codecs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coordinate::CoordinateCodec;
use crate::error::{CodecError, ConfigError};
use crate::resource::{AttributePacker, DEFAULT_RATE_WIDTH};

/// Registry-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtlasConfig {
    /// Symmetric bound of the x axis.
    pub x_bound: u32,
    /// Symmetric bound of the y axis.
    pub y_bound: u32,
    /// Exclusive upper bound of each production rate.
    pub rate_width: u32,
    /// Chain id embedded in global identifiers.
    pub chain_id: u8,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            x_bound: 100,
            y_bound: 100,
            rate_width: DEFAULT_RATE_WIDTH,
            chain_id: 1,
        }
    }
}

impl AtlasConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check that every codec can be built from these values.
    pub fn validate(&self) -> Result<(), CodecError> {
        self.coordinate_codec()?;
        self.attribute_packer()?;
        Ok(())
    }

    /// Coordinate codec for the configured bounds.
    pub fn coordinate_codec(&self) -> Result<CoordinateCodec, CodecError> {
        CoordinateCodec::new(self.x_bound, self.y_bound)
    }

    /// Attribute packer for the configured rate width.
    pub fn attribute_packer(&self) -> Result<AttributePacker, CodecError> {
        AttributePacker::new(self.rate_width)
    }
}
