//! # Check Subcommand
//!
//! Loads and verifies a shape directory without validating anything against
//! it — the fast way to learn that a definition is malformed or a reference
//! dangles, at the same construction-time boundary the engines enforce.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use shapecast_core::{ShapeError, ShapeRegistry};

/// Arguments for the `shapecast check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory containing *.shape.json definitions.
    #[arg(long)]
    pub shapes: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 when every definition loads and verifies, 1 when a
/// definition is malformed; I/O failures propagate as operational errors.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    match ShapeRegistry::load_dir(&args.shapes) {
        Ok(registry) => {
            println!(
                "OK: {} shape(s) loaded from {}",
                registry.len(),
                args.shapes.display()
            );
            for name in registry.names() {
                println!("  {name}");
            }
            Ok(0)
        }
        Err(ShapeError::Io(e)) => Err(e).with_context(|| {
            format!("failed to read shape directory {}", args.shapes.display())
        }),
        Err(e) => {
            println!("FAIL: {e}");
            Ok(1)
        }
    }
}
