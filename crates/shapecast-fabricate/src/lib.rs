//! # shapecast-fabricate — Conforming Value Synthesis
//!
//! Fabricates random values guaranteed to satisfy a [`Shape`]: for every
//! legal shape `s` and every context `c`, a value fabricated from `s` with
//! `c` validates as conforming to `s`.
//!
//! Each call owns its own [`FabricationContext`] — a seedable random source
//! plus a recursion-depth counter — so concurrent fabrication needs no
//! coordination, and a fixed seed reproduces a fabrication exactly.
//!
//! Generation policy (bounds, presence probabilities, recursion budget)
//! lives in [`FabricateLimits`] with documented defaults.
//!
//! [`Shape`]: shapecast_core::Shape

mod fabricate;

pub use fabricate::{FabricateLimits, FabricationContext, Fabricator};
