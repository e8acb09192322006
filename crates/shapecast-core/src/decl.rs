//! # Declarative Shape Descriptions
//!
//! The static, file-friendly form shapes are built from. A [`ShapeDecl`] is
//! a serde-tagged tree:
//!
//! ```json
//! { "kind": "object", "fields": {
//!     "id":     { "kind": "text" },
//!     "status": { "kind": "literal-union", "values": ["A", "B", "C"] },
//!     "score":  { "kind": "optional", "inner": { "kind": "float" } } } }
//! ```
//!
//! [`ShapeDecl::into_shape`] applies the construction-time invariants, so a
//! malformed description fails when it is loaded — never when a value is
//! later validated against it.
//!
//! Object fields in the declarative form are keyed by name and normalized
//! to name order, which keeps downstream fabrication deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MalformedShape, ShapeError};
use crate::shape::{LiteralValue, Shape};

/// A declarative shape description, parseable from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ShapeDecl {
    /// The boolean primitive.
    Boolean,
    /// The integer primitive.
    Integer,
    /// The float primitive.
    Float,
    /// The text primitive.
    Text,
    /// A single fixed value.
    Literal {
        /// The fixed value.
        value: LiteralValue,
    },
    /// A closed enumeration of fixed values.
    LiteralUnion {
        /// The members; must be non-empty and kind-homogeneous.
        values: Vec<LiteralValue>,
    },
    /// Absent or conforming to `inner`.
    Optional {
        /// The wrapped shape.
        inner: Box<ShapeDecl>,
    },
    /// Null or conforming to `inner`.
    Nullable {
        /// The wrapped shape.
        inner: Box<ShapeDecl>,
    },
    /// An ordered sequence of `element`.
    Array {
        /// The element shape.
        element: Box<ShapeDecl>,
    },
    /// A keyed record; field names are unique by construction of the map.
    Object {
        /// Field name to field shape.
        fields: BTreeMap<String, ShapeDecl>,
    },
    /// An ordered sequence of alternatives.
    Union {
        /// The variants; must be non-empty.
        variants: Vec<ShapeDecl>,
    },
    /// A reference to a named registry shape.
    Ref {
        /// The referenced shape name.
        name: String,
    },
}

impl ShapeDecl {
    /// Parse a declaration from JSON text.
    ///
    /// # Errors
    ///
    /// [`ShapeError::Parse`] when the text is not a well-formed declaration.
    pub fn parse(text: &str) -> Result<Self, ShapeError> {
        serde_json::from_str(text).map_err(|e| ShapeError::Parse {
            reason: e.to_string(),
        })
    }

    /// Convert this declaration into an immutable [`Shape`], enforcing the
    /// construction-time invariants.
    ///
    /// # Errors
    ///
    /// [`MalformedShape`] for an empty or kind-mixed literal union or an
    /// empty union, anywhere in the tree.
    pub fn into_shape(self) -> Result<Shape, MalformedShape> {
        match self {
            ShapeDecl::Boolean => Ok(Shape::boolean()),
            ShapeDecl::Integer => Ok(Shape::integer()),
            ShapeDecl::Float => Ok(Shape::float()),
            ShapeDecl::Text => Ok(Shape::text()),
            ShapeDecl::Literal { value } => {
                if let LiteralValue::Float(f) = &value {
                    if !f.is_finite() {
                        return Err(MalformedShape::NonFiniteLiteral(*f));
                    }
                }
                Ok(Shape::Literal(value))
            }
            ShapeDecl::LiteralUnion { values } => Shape::literal_union(values),
            ShapeDecl::Optional { inner } => Ok(Shape::optional(inner.into_shape()?)),
            ShapeDecl::Nullable { inner } => Ok(Shape::nullable(inner.into_shape()?)),
            ShapeDecl::Array { element } => Ok(Shape::array(element.into_shape()?)),
            ShapeDecl::Object { fields } => {
                let converted: Result<Vec<(String, Shape)>, MalformedShape> = fields
                    .into_iter()
                    .map(|(name, decl)| Ok((name, decl.into_shape()?)))
                    .collect();
                Shape::object(converted?)
            }
            ShapeDecl::Union { variants } => {
                let converted: Result<Vec<Shape>, MalformedShape> =
                    variants.into_iter().map(ShapeDecl::into_shape).collect();
                Shape::union(converted?)
            }
            ShapeDecl::Ref { name } => Ok(Shape::Ref(name)),
        }
    }
}
