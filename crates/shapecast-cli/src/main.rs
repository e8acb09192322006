//! # shapecast CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shapecast_cli::check::{run_check, CheckArgs};
use shapecast_cli::fabricate::{run_fabricate, FabricateArgs};
use shapecast_cli::validate::{run_validate, ValidateArgs};

/// shapecast — shape-driven validation and fabrication
///
/// Loads declarative data-shape definitions and either checks them, decides
/// whether a JSON document conforms to one, or fabricates random documents
/// guaranteed to conform.
#[derive(Parser, Debug)]
#[command(name = "shapecast", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and verify a directory of shape definitions.
    Check(CheckArgs),

    /// Validate a JSON document against a named shape.
    Validate(ValidateArgs),

    /// Fabricate conforming JSON documents from a named shape.
    Fabricate(FabricateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Validate(args) => run_validate(&args),
        Commands::Fabricate(args) => run_fabricate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
