//! # atlas CLI entry point
//!
//! Parses command-line arguments, loads the registry configuration and
//! dispatches to subcommand handlers. Every handler returns a JSON document
//! that is printed to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use atlas_cli::coord::{run_coord, CoordArgs};
use atlas_cli::id::{run_id, IdArgs};
use atlas_cli::rates::{run_rates, RatesArgs};

/// Atlas land registry toolchain.
///
/// Encodes and inspects parcel coordinates, packed production rates and
/// global identifiers without a running registry.
#[derive(Parser, Debug)]
#[command(name = "atlas", version, about, long_about = None)]
struct Cli {
    /// Path to a YAML registry configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Coordinate ↔ local index conversion.
    Coord(CoordArgs),

    /// Production rate packing.
    Rates(RatesArgs),

    /// Global identifier construction and inspection.
    Id(IdArgs),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = atlas_cli::load_config(cli.config.as_deref()).and_then(|config| {
        tracing::debug!(?config, "configuration loaded");
        match &cli.command {
            Commands::Coord(args) => run_coord(args, &config),
            Commands::Rates(args) => run_rates(args, &config),
            Commands::Id(args) => run_id(args, &config),
        }
    });

    match result.and_then(|output| Ok(serde_json::to_string_pretty(&output)?)) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
