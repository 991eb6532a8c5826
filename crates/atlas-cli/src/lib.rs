//! # atlas-cli — Atlas Command-Line Interface
//!
//! Offline tooling over the `atlas-core` codecs. Nothing here holds
//! registry state: every subcommand is a pure function of its arguments and
//! the loaded [`AtlasConfig`].
//!
//! ## Subcommands
//!
//! - `coord` — coordinate encode/decode
//! - `rates` — production rate pack/unpack
//! - `id` — global identifier construction and layout breakdown
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `atlas-core` and return JSON values; printing
//!   happens in `main`.

use std::path::Path;

use anyhow::{Context, Result};
use atlas_core::AtlasConfig;

pub mod coord;
pub mod id;
pub mod rates;

/// Load the configuration at `path`, or the defaults when absent.
pub fn load_config(path: Option<&Path>) -> Result<AtlasConfig> {
    match path {
        Some(path) => AtlasConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(AtlasConfig::default()),
    }
}

/// Parse an unsigned 128-bit value given in decimal or `0x` hex.
pub fn parse_u128(text: &str) -> Result<u128, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u128::from_str_radix(hex, 16),
        None => text.parse::<u128>(),
    };
    parsed.map_err(|e| format!("invalid number {text:?}: {e}"))
}
