//! # Rates Subcommand
//!
//! Packs five production rates into one attribute word and back.

use anyhow::Result;
use atlas_core::{AtlasConfig, ProductionRates};
use clap::{Args, Subcommand};
use serde_json::{json, Map, Value};

/// Arguments for the `atlas rates` subcommand.
#[derive(Args, Debug)]
pub struct RatesArgs {
    #[command(subcommand)]
    pub command: RatesCommand,
}

/// Rate packing operations.
#[derive(Subcommand, Debug)]
pub enum RatesCommand {
    /// Five rates (gold wood water fire soil) → attribute.
    Pack {
        gold: u32,
        wood: u32,
        water: u32,
        fire: u32,
        soil: u32,
    },
    /// Attribute (decimal or 0x hex) → five rates.
    Unpack {
        #[arg(value_parser = crate::parse_u128)]
        attribute: u128,
    },
}

fn rates_json(rates: &ProductionRates) -> Value {
    let map: Map<String, Value> = rates
        .iter()
        .map(|(kind, rate)| (kind.as_str().to_string(), json!(rate)))
        .collect();
    Value::Object(map)
}

/// Execute the rates subcommand.
///
/// Attributes are rendered as decimal strings; JSON numbers cannot carry
/// the full 128-bit range.
pub fn run_rates(args: &RatesArgs, config: &AtlasConfig) -> Result<Value> {
    let packer = config.attribute_packer()?;
    match args.command {
        RatesCommand::Pack {
            gold,
            wood,
            water,
            fire,
            soil,
        } => {
            let rates = ProductionRates::new(gold, wood, water, fire, soil);
            let attribute = packer.pack(&rates)?;
            Ok(json!({
                "attribute": attribute.to_string(),
                "attribute_hex": format!("0x{attribute:x}"),
                "rates": rates_json(&rates),
            }))
        }
        RatesCommand::Unpack { attribute } => {
            let rates = packer.unpack(attribute);
            Ok(json!({
                "attribute": attribute.to_string(),
                "rates": rates_json(&rates),
            }))
        }
    }
}
