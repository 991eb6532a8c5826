//! # Id Subcommand
//!
//! Builds land identifiers from a coordinate and a module index, and breaks
//! any identifier down into its layout fields.
//!
//! No module table is available offline, so `inspect` can only check the
//! fields that do not depend on registration: magic byte, chain id and the
//! reserved byte.

use anyhow::Result;
use atlas_core::{AtlasConfig, GlobalId, ModuleIndex, LAND_CLASS};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

/// Arguments for the `atlas id` subcommand.
#[derive(Args, Debug)]
pub struct IdArgs {
    #[command(subcommand)]
    pub command: IdCommand,
}

/// Identifier operations.
#[derive(Subcommand, Debug)]
pub enum IdCommand {
    /// Land identifier for a coordinate.
    Land {
        /// X coordinate.
        #[arg(long, allow_negative_numbers = true)]
        x: i32,
        /// Y coordinate.
        #[arg(long, allow_negative_numbers = true)]
        y: i32,
        /// Registration index of the land module.
        #[arg(long)]
        module_index: u32,
    },
    /// Layout breakdown of an identifier.
    Inspect {
        /// Identifier as `0x` hex.
        global_id: GlobalId,
    },
}

/// Execute the id subcommand.
pub fn run_id(args: &IdArgs, config: &AtlasConfig) -> Result<Value> {
    match args.command {
        IdCommand::Land { x, y, module_index } => {
            let codec = config.coordinate_codec()?;
            let local_index = codec.encode(x, y)?;
            let id = GlobalId::compose(
                config.chain_id,
                LAND_CLASS,
                ModuleIndex(module_index),
                local_index,
            );
            Ok(json!({
                "global_id": id.to_string(),
                "x": x,
                "y": y,
                "module_index": module_index,
                "local_index": local_index,
            }))
        }
        IdCommand::Inspect { global_id } => inspect(global_id, config),
    }
}

fn inspect(id: GlobalId, config: &AtlasConfig) -> Result<Value> {
    let parts = id.parts();
    let mut report = json!({
        "global_id": id.to_string(),
        "magic": format!("0x{:02x}", parts.magic),
        "chain_id": parts.chain_id,
        "class_tag": parts.class_tag.0,
        "reserved": parts.reserved,
        "module_index": parts.module_index.0,
        "local_index": parts.local_index,
        "well_formed": parts.is_well_formed(config.chain_id),
    });
    if parts.class_tag == LAND_CLASS {
        let codec = config.coordinate_codec()?;
        if let Ok(coordinate) = codec.decode(parts.local_index) {
            report["coordinate"] = json!({ "x": coordinate.x, "y": coordinate.y });
        }
    }
    Ok(report)
}
