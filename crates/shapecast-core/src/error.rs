//! # Error Hierarchy
//!
//! Structured error types for shape construction and registry loading,
//! built with `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Note what is *not* here: a failed validation. Conformance failures are
//! returned as [`crate::ValidationReport`] values, never raised as errors.

use thiserror::Error;

use crate::shape::PrimitiveKind;

/// A shape that violates a construction-time invariant.
///
/// These errors are fatal for the offending definition and never recoverable
/// by the engine — the declarative description must be fixed. They are raised
/// when a shape is built or a registry is verified, never during validation
/// or fabrication of well-formed shapes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedShape {
    /// A literal union with zero members matches nothing.
    #[error("literal union must have at least one member")]
    EmptyLiteralUnion,

    /// All members of a literal union must share one primitive kind.
    #[error("literal union mixes primitive kinds: expected {expected}, found {found}")]
    MixedLiteralUnion {
        /// The kind of the first member.
        expected: PrimitiveKind,
        /// The kind of the offending member.
        found: PrimitiveKind,
    },

    /// Object field names must be unique.
    #[error("duplicate object field: {name}")]
    DuplicateField {
        /// The repeated field name.
        name: String,
    },

    /// JSON cannot represent a non-finite number, so no value could ever
    /// match such a literal.
    #[error("literal float must be finite, got {0}")]
    NonFiniteLiteral(f64),

    /// A union with zero variants matches nothing.
    #[error("union must have at least one variant")]
    EmptyUnion,

    /// A reference names a shape the registry does not define.
    #[error("reference to undefined shape: {name}")]
    UnresolvedRef {
        /// The unresolved shape name.
        name: String,
    },

    /// A chain of references that never reaches a structural shape.
    #[error("reference cycle with no structure through shape: {name}")]
    CyclicRef {
        /// A shape name on the cycle.
        name: String,
    },
}

/// Errors from building, loading, or resolving shape definitions.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// A shape violated a construction-time invariant.
    #[error("malformed shape: {0}")]
    Malformed(#[from] MalformedShape),

    /// A shape definition file could not be read or parsed.
    #[error("failed to load shape definition {path}: {reason}")]
    Load {
        /// Path of the offending file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A declarative shape description could not be parsed.
    #[error("failed to parse shape description: {reason}")]
    Parse {
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A name was looked up that the registry does not define.
    #[error("unknown shape: {0}")]
    UnknownShape(String),

    /// A name was defined twice in one registry.
    #[error("shape already defined: {0}")]
    DuplicateShape(String),

    /// Fabrication exceeded its recursion budget. Only reachable for
    /// self-referential shapes whose every cycle passes through required
    /// structure, leaving no finite conforming value.
    #[error("recursion budget exceeded at depth {depth}; shape has no finite conforming value")]
    DepthExceeded {
        /// The depth at which fabrication gave up.
        depth: usize,
    },

    /// I/O error while reading shape definitions.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
