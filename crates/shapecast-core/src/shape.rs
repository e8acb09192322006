//! # Shape Descriptors
//!
//! The recursive, immutable description of a data shape. Shapes are pure
//! data: validation lives in `shapecast-validate` and fabrication in
//! `shapecast-fabricate`, both of which consume shapes read-only.
//!
//! Construction is where invariants are enforced. The fallible constructors
//! ([`Shape::literal_union`], [`Shape::object`], [`Shape::union`]) reject
//! malformed descriptions with [`MalformedShape`]; everything else is valid
//! by construction.

use serde::{Deserialize, Serialize};

use crate::error::MalformedShape;

/// The runtime kind of a primitive shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    /// JSON true / false.
    Boolean,
    /// A JSON number with zero fractional component.
    Integer,
    /// Any finite JSON number.
    Float,
    /// A JSON string.
    Text,
}

impl PrimitiveKind {
    /// The lowercase name used in summaries and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Text => "text",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed value of one primitive kind, used by [`Shape::Literal`] and
/// [`Shape::LiteralUnion`].
///
/// Serializes untagged, so the declarative form writes members as plain JSON
/// scalars: `"values": ["A", "B", "C"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// A fixed boolean.
    Boolean(bool),
    /// A fixed integer.
    Integer(i64),
    /// A fixed float.
    Float(f64),
    /// A fixed string.
    Text(String),
}

impl LiteralValue {
    /// The primitive kind this literal belongs to.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            LiteralValue::Boolean(_) => PrimitiveKind::Boolean,
            LiteralValue::Integer(_) => PrimitiveKind::Integer,
            LiteralValue::Float(_) => PrimitiveKind::Float,
            LiteralValue::Text(_) => PrimitiveKind::Text,
        }
    }

    /// Render this literal as a runtime JSON value.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            LiteralValue::Boolean(b) => serde_json::Value::Bool(*b),
            LiteralValue::Integer(i) => serde_json::Value::from(*i),
            LiteralValue::Float(f) => serde_json::Value::from(*f),
            LiteralValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }

    /// Value-equality against a runtime value. Numeric comparisons are
    /// numeric, so the literal `2` matches the value `2.0`.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            LiteralValue::Boolean(b) => value.as_bool() == Some(*b),
            LiteralValue::Integer(i) => match value.as_i64() {
                Some(n) => n == *i,
                None => value.as_f64() == Some(*i as f64),
            },
            LiteralValue::Float(f) => value.as_f64() == Some(*f),
            LiteralValue::Text(s) => value.as_str() == Some(s.as_str()),
        }
    }
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Boolean(b) => write!(f, "{b}"),
            LiteralValue::Integer(i) => write!(f, "{i}"),
            LiteralValue::Float(x) => write!(f, "{x}"),
            LiteralValue::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        LiteralValue::Boolean(v)
    }
}

impl From<i64> for LiteralValue {
    fn from(v: i64) -> Self {
        LiteralValue::Integer(v)
    }
}

impl From<f64> for LiteralValue {
    fn from(v: f64) -> Self {
        LiteralValue::Float(v)
    }
}

impl From<&str> for LiteralValue {
    fn from(v: &str) -> Self {
        LiteralValue::Text(v.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(v: String) -> Self {
        LiteralValue::Text(v)
    }
}

/// A named object field and its shape. Declaration order is preserved so
/// fabrication and diagnostics are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShape {
    /// The field name.
    pub name: String,
    /// The field's shape.
    pub shape: Shape,
}

/// An immutable description of a data shape.
///
/// Built once (programmatically or from a [`crate::ShapeDecl`]), then shared
/// read-only across every validation and fabrication call for the process
/// lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A primitive runtime kind.
    Primitive(PrimitiveKind),
    /// Exactly one fixed value.
    Literal(LiteralValue),
    /// A closed enumeration of fixed values sharing one primitive kind.
    /// Non-empty by construction.
    LiteralUnion(Vec<LiteralValue>),
    /// Absent (in object-field position) or conforming to the inner shape.
    Optional(Box<Shape>),
    /// JSON null or conforming to the inner shape.
    Nullable(Box<Shape>),
    /// An ordered sequence whose every element conforms to the element shape.
    Array(Box<Shape>),
    /// A keyed record with uniquely named fields in declaration order.
    Object(Vec<FieldShape>),
    /// An ordered sequence of alternatives; a value conforms if any variant
    /// accepts it, and the first declared match wins. Non-empty by
    /// construction.
    Union(Vec<Shape>),
    /// A reference to a named shape in a [`crate::ShapeRegistry`]. This is
    /// how recursive and shared shapes are expressed.
    Ref(String),
}

impl Shape {
    /// The boolean primitive.
    pub fn boolean() -> Self {
        Shape::Primitive(PrimitiveKind::Boolean)
    }

    /// The integer primitive.
    pub fn integer() -> Self {
        Shape::Primitive(PrimitiveKind::Integer)
    }

    /// The float primitive.
    pub fn float() -> Self {
        Shape::Primitive(PrimitiveKind::Float)
    }

    /// The text primitive.
    pub fn text() -> Self {
        Shape::Primitive(PrimitiveKind::Text)
    }

    /// A single fixed value.
    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Shape::Literal(value.into())
    }

    /// A closed enumeration of fixed values.
    ///
    /// # Errors
    ///
    /// [`MalformedShape::EmptyLiteralUnion`] for zero members and
    /// [`MalformedShape::MixedLiteralUnion`] when members do not share one
    /// primitive kind.
    pub fn literal_union<I, V>(members: I) -> Result<Self, MalformedShape>
    where
        I: IntoIterator<Item = V>,
        V: Into<LiteralValue>,
    {
        let members: Vec<LiteralValue> = members.into_iter().map(Into::into).collect();
        let Some(first) = members.first() else {
            return Err(MalformedShape::EmptyLiteralUnion);
        };
        let expected = first.kind();
        for member in &members {
            if member.kind() != expected {
                return Err(MalformedShape::MixedLiteralUnion {
                    expected,
                    found: member.kind(),
                });
            }
            if let LiteralValue::Float(f) = member {
                if !f.is_finite() {
                    return Err(MalformedShape::NonFiniteLiteral(*f));
                }
            }
        }
        Ok(Shape::LiteralUnion(members))
    }

    /// An optional wrapper around `inner`.
    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    /// A nullable wrapper around `inner`.
    pub fn nullable(inner: Shape) -> Self {
        Shape::Nullable(Box::new(inner))
    }

    /// An array of `element`.
    pub fn array(element: Shape) -> Self {
        Shape::Array(Box::new(element))
    }

    /// An object with the given named fields.
    ///
    /// # Errors
    ///
    /// [`MalformedShape::DuplicateField`] when two fields share a name.
    pub fn object<I, S>(fields: I) -> Result<Self, MalformedShape>
    where
        I: IntoIterator<Item = (S, Shape)>,
        S: Into<String>,
    {
        let mut out: Vec<FieldShape> = Vec::new();
        for (name, shape) in fields {
            let name = name.into();
            if out.iter().any(|f| f.name == name) {
                return Err(MalformedShape::DuplicateField { name });
            }
            out.push(FieldShape { name, shape });
        }
        Ok(Shape::Object(out))
    }

    /// A union of the given variants, tried in declared order.
    ///
    /// # Errors
    ///
    /// [`MalformedShape::EmptyUnion`] for zero variants.
    pub fn union(variants: Vec<Shape>) -> Result<Self, MalformedShape> {
        if variants.is_empty() {
            return Err(MalformedShape::EmptyUnion);
        }
        Ok(Shape::Union(variants))
    }

    /// A reference to a named registry shape.
    pub fn reference(name: impl Into<String>) -> Self {
        Shape::Ref(name.into())
    }

    /// Whether this shape (without following references) is an optional
    /// wrapper.
    pub fn is_optional(&self) -> bool {
        matches!(self, Shape::Optional(_))
    }

    /// A compact human-readable description, used in violation messages.
    pub fn summary(&self) -> String {
        match self {
            Shape::Primitive(kind) => kind.name().to_string(),
            Shape::Literal(value) => value.to_string(),
            Shape::LiteralUnion(members) => members
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" | "),
            Shape::Optional(inner) => format!("optional<{}>", inner.summary()),
            Shape::Nullable(inner) => format!("nullable<{}>", inner.summary()),
            Shape::Array(element) => format!("array<{}>", element.summary()),
            Shape::Object(fields) => {
                let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                format!("object{{{}}}", names.join(", "))
            }
            Shape::Union(variants) => variants
                .iter()
                .map(|v| v.summary())
                .collect::<Vec<_>>()
                .join(" | "),
            Shape::Ref(name) => format!("&{name}"),
        }
    }

    /// Look up a declared field by name. Only meaningful for
    /// [`Shape::Object`]; returns `None` otherwise.
    pub fn field(&self, name: &str) -> Option<&Shape> {
        match self {
            Shape::Object(fields) => fields.iter().find(|f| f.name == name).map(|f| &f.shape),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_union_rejects_empty() {
        let err = Shape::literal_union(Vec::<LiteralValue>::new()).unwrap_err();
        assert_eq!(err, MalformedShape::EmptyLiteralUnion);
    }

    #[test]
    fn literal_union_rejects_mixed_kinds() {
        let err =
            Shape::literal_union(vec![LiteralValue::from("A"), LiteralValue::from(3_i64)])
                .unwrap_err();
        assert_eq!(
            err,
            MalformedShape::MixedLiteralUnion {
                expected: PrimitiveKind::Text,
                found: PrimitiveKind::Integer,
            }
        );
    }

    #[test]
    fn literal_union_accepts_homogeneous_members() {
        let shape = Shape::literal_union(["A", "B", "C"]).unwrap();
        assert_eq!(shape.summary(), r#""A" | "B" | "C""#);
    }

    #[test]
    fn object_rejects_duplicate_fields() {
        let err = Shape::object([("id", Shape::text()), ("id", Shape::integer())]).unwrap_err();
        assert_eq!(err, MalformedShape::DuplicateField { name: "id".into() });
    }

    #[test]
    fn object_preserves_declaration_order() {
        let shape = Shape::object([
            ("zebra", Shape::text()),
            ("alpha", Shape::integer()),
        ])
        .unwrap();
        assert_eq!(shape.summary(), "object{zebra, alpha}");
        assert_eq!(shape.field("alpha"), Some(&Shape::integer()));
        assert_eq!(shape.field("missing"), None);
    }

    #[test]
    fn union_rejects_empty() {
        assert_eq!(Shape::union(vec![]).unwrap_err(), MalformedShape::EmptyUnion);
    }

    #[test]
    fn literal_matching_is_value_equality() {
        assert!(LiteralValue::from("A").matches(&json!("A")));
        assert!(!LiteralValue::from("A").matches(&json!("B")));
        assert!(LiteralValue::from(2_i64).matches(&json!(2)));
        assert!(LiteralValue::from(2_i64).matches(&json!(2.0)));
        assert!(!LiteralValue::from(2_i64).matches(&json!(2.5)));
        assert!(LiteralValue::from(1.5).matches(&json!(1.5)));
        assert!(LiteralValue::from(true).matches(&json!(true)));
        assert!(!LiteralValue::from(true).matches(&json!("true")));
    }

    #[test]
    fn summaries_are_compact() {
        assert_eq!(Shape::integer().summary(), "integer");
        assert_eq!(Shape::optional(Shape::text()).summary(), "optional<text>");
        assert_eq!(
            Shape::array(Shape::nullable(Shape::float())).summary(),
            "array<nullable<float>>"
        );
        assert_eq!(Shape::reference("user").summary(), "&user");
    }
}
