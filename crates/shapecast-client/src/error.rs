//! Client error types.
//!
//! The taxonomy mirrors how failures should be handled, not where they
//! occur: conformance failures on the *request* side reject the call before
//! any I/O; a non-conforming *response* is a contract violation carrying the
//! full violation list; transport failures pass through unmodified.

use thiserror::Error;

use shapecast_core::{MalformedShape, ShapeError, Violation};

/// Errors surfaced by the transport collaborator.
///
/// Opaque to the call façade: whatever the transport reports is handed to
/// the caller as-is, with no retries and no reinterpretation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response (connect failure, timeout).
    #[error("transport failure calling {endpoint}: {reason}")]
    Connect {
        /// The endpoint identifier.
        endpoint: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        /// The endpoint identifier.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The response body could not be read as JSON.
    #[error("unreadable response payload from {endpoint}: {reason}")]
    Payload {
        /// The endpoint identifier.
        endpoint: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors from building an endpoint catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two endpoints share an identifier.
    #[error("endpoint already defined: {id}")]
    DuplicateEndpoint {
        /// The repeated endpoint identifier.
        id: String,
    },

    /// The catalog file could not be read or parsed.
    #[error("failed to load endpoint catalog {path}: {reason}")]
    Load {
        /// Path of the offending file.
        path: String,
        /// Human-readable reason.
        reason: String,
    },

    /// An endpoint's request or response shape is malformed or references
    /// a shape the registry does not define.
    #[error("malformed shape in endpoint {id}: {source}")]
    Malformed {
        /// The endpoint identifier.
        id: String,
        /// The underlying shape defect.
        source: MalformedShape,
    },
}

/// Errors from a typed endpoint call.
#[derive(Debug, Error)]
pub enum CallError {
    /// No endpoint with this identifier exists in the catalog.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The caller's arguments do not conform to the request shape. The call
    /// is rejected before any transport activity.
    #[error("request for {endpoint} rejected with {} violation(s)", .violations.len())]
    RequestRejected {
        /// The endpoint identifier.
        endpoint: String,
        /// Why the arguments do not conform.
        violations: Vec<Violation>,
    },

    /// Live mode only: the server's response does not conform to the
    /// endpoint's declared response shape.
    #[error("response from {endpoint} violated its declared shape with {} violation(s)", .violations.len())]
    ContractViolation {
        /// The endpoint identifier.
        endpoint: String,
        /// Where the response diverges from its declared shape.
        violations: Vec<Violation>,
    },

    /// The transport collaborator failed; passed through unmodified.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A shape-level failure (unresolved reference, no finite conforming
    /// value during simulation).
    #[error("shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Client configuration was unusable.
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The endpoint catalog could not be built.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
