//! # Coord Subcommand
//!
//! Converts between grid coordinates and the local index used inside land
//! identifiers, using the configured axis bounds.

use anyhow::Result;
use atlas_core::AtlasConfig;
use clap::{Args, Subcommand};
use serde_json::{json, Value};

/// Arguments for the `atlas coord` subcommand.
#[derive(Args, Debug)]
pub struct CoordArgs {
    #[command(subcommand)]
    pub command: CoordCommand,
}

/// Coordinate operations.
#[derive(Subcommand, Debug)]
pub enum CoordCommand {
    /// Coordinate → local index.
    Encode {
        /// X coordinate.
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        /// Y coordinate.
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
    },
    /// Local index → coordinate.
    Decode {
        /// Local index.
        index: u64,
    },
}

/// Execute the coord subcommand.
pub fn run_coord(args: &CoordArgs, config: &AtlasConfig) -> Result<Value> {
    let codec = config.coordinate_codec()?;
    match args.command {
        CoordCommand::Encode { x, y } => {
            let index = codec.encode(x, y)?;
            Ok(json!({ "x": x, "y": y, "index": index }))
        }
        CoordCommand::Decode { index } => {
            let coordinate = codec.decode(index)?;
            Ok(json!({ "index": index, "x": coordinate.x, "y": coordinate.y }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(command: CoordCommand, config: &AtlasConfig) -> Result<Value> {
        run_coord(&CoordArgs { command }, config)
    }

    #[test]
    fn encode_then_decode() {
        let config = AtlasConfig::default();
        let encoded = run(CoordCommand::Encode { x: -90, y: 12 }, &config).unwrap();
        let index = encoded["index"].as_u64().unwrap();
        let decoded = run(CoordCommand::Decode { index }, &config).unwrap();
        assert_eq!(decoded["x"], -90);
        assert_eq!(decoded["y"], 12);
    }

    #[test]
    fn bounds_follow_config() {
        let config = AtlasConfig {
            y_bound: 30,
            ..AtlasConfig::default()
        };
        assert!(run(CoordCommand::Encode { x: -99, y: 32 }, &config).is_err());
        assert!(run(CoordCommand::Encode { x: -99, y: 12 }, &config).is_ok());
    }

    #[test]
    fn index_past_capacity_rejected() {
        let config = AtlasConfig::default();
        let capacity = config.coordinate_codec().unwrap().capacity();
        assert!(run(CoordCommand::Decode { index: capacity }, &config).is_err());
    }
}
