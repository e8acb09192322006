//! # shapecast-cli — Subcommand Implementations
//!
//! Library side of the `shapecast` binary. Each subcommand lives in its own
//! module with a clap `Args` struct and a `run_*` entry point returning the
//! process exit code: 0 on success, 1 on a conformance/definition failure,
//! operational errors propagate as `anyhow::Error` (exit 2 in `main`).

pub mod check;
pub mod fabricate;
pub mod validate;

use std::path::Path;

use anyhow::Context;

use shapecast_core::ShapeRegistry;

/// Load and verify a shape registry from a `*.shape.json` directory.
pub(crate) fn load_registry(dir: &Path) -> anyhow::Result<ShapeRegistry> {
    let registry = ShapeRegistry::load_dir(dir)
        .with_context(|| format!("failed to load shape definitions from {}", dir.display()))?;
    tracing::info!(shape_count = registry.len(), "loaded shape registry");
    Ok(registry)
}
