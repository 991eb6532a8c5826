//! # atlas-core — Foundational Types for the Atlas Land Registry
//!
//! This crate is the leaf of the Atlas workspace. It owns every piece of
//! bit-level layout that the registry modules share: how a coordinate
//! becomes a local index, how five production rates become one attribute
//! word, which marker flags a parcel may carry, and how a (module, local
//! index) pair becomes a global identifier.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes for every handle.** `Address`, `Selector`, `GlobalId`,
//!    `ClassTag`, `ModuleIndex`. No bare integers crossing module seams.
//!
//! 2. **Range checks before arithmetic.** The codecs reject out-of-range
//!    input up front and never rely on wraparound or truncation.
//!
//! 3. **Configurable geometry.** Coordinate bounds, rate width and chain id
//!    come from `AtlasConfig`, validated once before any codec is built.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `atlas-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod flags;
pub mod global_id;
pub mod resource;
pub mod selector;

// Re-export primary types for ergonomic imports.
pub use address::Address;
pub use config::AtlasConfig;
pub use coordinate::{Axis, Coordinate, CoordinateCodec};
pub use error::{CodecError, ConfigError};
pub use flags::LandFlags;
pub use global_id::{
    ClassTag, GlobalId, GlobalIdParts, ModuleIndex, GLOBAL_ID_MAGIC, LAND_CLASS, LEDGER_CLASS,
};
pub use resource::{
    AttributePacker, ProductionRates, ResourceKind, DEFAULT_RATE_WIDTH, RESOURCE_KIND_COUNT,
};
pub use selector::Selector;
