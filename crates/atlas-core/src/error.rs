//! # Error Types
//!
//! Errors raised by the leaf codecs and by configuration loading. All are
//! expected, caller-triggerable outcomes; none of them indicate a broken
//! process.

use thiserror::Error;

use crate::coordinate::Axis;
use crate::resource::ResourceKind;

/// Failure of a codec operation (coordinates, rates, identifiers, parsing).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A coordinate component lies outside the configured symmetric bound.
    #[error("coordinate {axis} = {value} is outside [-{bound}, {bound}]")]
    OutOfRange {
        /// Which axis was rejected.
        axis: Axis,
        /// The supplied value.
        value: i32,
        /// The configured bound for that axis.
        bound: u32,
    },

    /// A local index that no coordinate inside the bounds encodes to.
    #[error("local index {index} was not produced by this codec (capacity {capacity})")]
    InvalidIndex {
        /// The rejected index.
        index: u64,
        /// Number of valid indices for the configured bounds.
        capacity: u64,
    },

    /// A production rate does not fit its slot.
    #[error("{kind} rate {rate} exceeds slot width {width}")]
    RateOutOfRange {
        /// Resource whose rate was rejected.
        kind: ResourceKind,
        /// The supplied rate.
        rate: u32,
        /// Exclusive upper bound for every rate.
        width: u32,
    },

    /// Codec parameters that cannot produce a bijective layout.
    #[error("invalid codec parameters: {0}")]
    InvalidParameters(String),

    /// Parcel flag bits outside the defined set.
    #[error("unknown parcel flag bits {0:#04x}")]
    UnknownFlags(u8),

    /// Malformed textual address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed textual selector.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Malformed textual global identifier.
    #[error("invalid global identifier: {0}")]
    InvalidGlobalId(String),
}

/// Failure to load or validate an [`AtlasConfig`](crate::AtlasConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML document did not match the config schema.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Values parsed but are unusable.
    #[error("invalid config: {0}")]
    Invalid(#[from] CodecError),
}
