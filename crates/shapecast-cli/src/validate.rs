//! # Validate Subcommand
//!
//! Validates a JSON document against a named shape from a shape directory,
//! printing either `OK` or one violation per line with its path.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use shapecast_core::ValidationReport;
use shapecast_validate::{ObjectPolicy, Validator};

/// Arguments for the `shapecast validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory containing *.shape.json definitions.
    #[arg(long)]
    pub shapes: PathBuf,

    /// Name of the shape to validate against.
    #[arg(long)]
    pub shape: String,

    /// Reject object fields the shape does not declare.
    #[arg(long)]
    pub strict: bool,

    /// Path to the JSON document to validate.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document conforms, 1 when it does not.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let registry = crate::load_registry(&args.shapes)?;
    let shape = registry
        .get(&args.shape)
        .ok_or_else(|| anyhow::anyhow!("unknown shape: {}", args.shape))?;

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", args.input.display()))?;

    let policy = if args.strict {
        ObjectPolicy::Strict
    } else {
        ObjectPolicy::Lenient
    };
    let validator = Validator::new(&registry).with_policy(policy);

    match validator.validate(shape, &value) {
        ValidationReport::Valid => {
            println!("OK: {} conforms to {}", args.input.display(), args.shape);
            Ok(0)
        }
        ValidationReport::Invalid(violations) => {
            println!(
                "FAIL: {} violation(s) against {}",
                violations.len(),
                args.shape
            );
            for violation in &violations {
                println!("  {violation}");
            }
            Ok(1)
        }
    }
}
