#![deny(missing_docs)]

//! # shapecast-core — Shape Descriptors for the shapecast Toolkit
//!
//! This crate defines the foundational types every other crate in the
//! workspace depends on. It has no internal crate dependencies — only
//! `serde`, `serde_json`, and `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Shapes are immutable data.** A [`Shape`] describes a data shape —
//!    primitives, literals, closed literal enumerations, optional/nullable
//!    wrappers, arrays, objects, unions, and named references. It carries no
//!    behavior and no per-call state, so a shape built once at startup can be
//!    validated against and fabricated from concurrently without coordination.
//!
//! 2. **Malformed shapes fail at construction.** An empty literal union, a
//!    kind-mixed literal union, a duplicate object field, or an unresolved
//!    reference is a [`MalformedShape`] error the moment the shape (or the
//!    registry holding it) is built — never a surprise at validation time.
//!
//! 3. **Validation outcomes are data, not errors.** [`ValidationReport`] is a
//!    first-class value carrying every [`Violation`] with its [`ValuePath`],
//!    so callers can branch on conformance failures instead of catching them.

pub mod decl;
pub mod error;
pub mod registry;
pub mod report;
pub mod shape;

// Re-export primary types at crate root for ergonomic imports.
pub use decl::ShapeDecl;
pub use error::{MalformedShape, ShapeError};
pub use registry::ShapeRegistry;
pub use report::{
    value_summary, PathSegment, ValidationReport, ValuePath, Violation, ViolationKind,
};
pub use shape::{FieldShape, LiteralValue, PrimitiveKind, Shape};
