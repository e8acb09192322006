//! # shapecast-validate — Structural Conformance Validation
//!
//! Decides whether an arbitrary runtime value conforms to a [`Shape`],
//! producing a [`ValidationReport`] with the complete, ordered violation
//! list rather than a bare boolean or a thrown error.
//!
//! ## Guarantees
//!
//! - `validate` is a total, pure function of its inputs: any value against
//!   any well-formed shape yields `Valid` or `Invalid`, never a panic.
//! - Array and object traversal collect *every* violation — diagnostics for
//!   a 30-element array with three bad entries name all three paths.
//! - Union variants are tried in declared order and the first match wins,
//!   keeping outcomes deterministic and order-sensitive.
//!
//! [`Shape`]: shapecast_core::Shape
//! [`ValidationReport`]: shapecast_core::ValidationReport

mod validate;

pub use validate::{ObjectPolicy, Validator};
