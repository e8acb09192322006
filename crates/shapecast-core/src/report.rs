//! # Validation Result Model
//!
//! Conformance outcomes as plain data. A [`ValidationReport`] is either
//! `Valid` or `Invalid` with the full ordered list of [`Violation`]s, each
//! locating its failure with a [`ValuePath`]. Callers branch on reports;
//! nothing here is ever thrown.

use serde_json::Value;

/// One step into a value: an object field or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object field name.
    Field(String),
    /// An array index.
    Index(usize),
}

/// The location of a value inside a larger value, rendered JSON-Pointer
/// style: `/items/2/status`. The root path renders as `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    /// The root path (the value itself).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// This path extended by an object field.
    pub fn child_field(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Field(name.to_string()));
        Self(segments)
    }

    /// This path extended by an array index.
    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }
}

impl std::fmt::Display for ValuePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            match segment {
                PathSegment::Field(name) => write!(f, "/{name}")?,
                PathSegment::Index(index) => write!(f, "/{index}")?,
            }
        }
        Ok(())
    }
}

/// Classification of a single conformance failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The value does not match the expected shape.
    Mismatch,
    /// A required object field is absent.
    MissingField,
    /// An object field not declared by the shape, under strict policy.
    UnexpectedField,
    /// No variant of a union accepted the value.
    NoUnionVariant,
}

/// A single conformance failure: where it happened, what was expected,
/// and a summary of what was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Location of the failure inside the candidate value.
    pub path: ValuePath,
    /// Compact description of the expected shape.
    pub expected: String,
    /// Compact summary of the offending value.
    pub actual: String,
    /// Failure classification.
    pub kind: ViolationKind,
}

impl Violation {
    /// A plain shape/value mismatch.
    pub fn mismatch(path: ValuePath, expected: impl Into<String>, actual: &Value) -> Self {
        Self {
            path,
            expected: expected.into(),
            actual: value_summary(actual),
            kind: ViolationKind::Mismatch,
        }
    }

    /// A missing required field.
    pub fn missing_field(path: ValuePath, expected: impl Into<String>) -> Self {
        Self {
            path,
            expected: expected.into(),
            actual: "absent".to_string(),
            kind: ViolationKind::MissingField,
        }
    }

    /// An undeclared field rejected under strict policy.
    pub fn unexpected_field(path: ValuePath, actual: &Value) -> Self {
        Self {
            path,
            expected: "no such field".to_string(),
            actual: value_summary(actual),
            kind: ViolationKind::UnexpectedField,
        }
    }

    /// The marker appended when every union variant rejected the value.
    pub fn no_union_variant(path: ValuePath, expected: impl Into<String>, actual: &Value) -> Self {
        Self {
            path,
            expected: expected.into(),
            actual: value_summary(actual),
            kind: ViolationKind::NoUnionVariant,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ViolationKind::Mismatch => {
                write!(f, "at {}: expected {}, got {}", self.path, self.expected, self.actual)
            }
            ViolationKind::MissingField => {
                write!(f, "at {}: missing required field ({})", self.path, self.expected)
            }
            ViolationKind::UnexpectedField => {
                write!(f, "at {}: unexpected field (got {})", self.path, self.actual)
            }
            ViolationKind::NoUnionVariant => {
                write!(f, "at {}: no variant of {} matched {}", self.path, self.expected, self.actual)
            }
        }
    }
}

/// The outcome of validating a value against a shape.
///
/// An `Invalid` report carries every violation found, in traversal order —
/// array and object validation do not stop at the first failure, so the
/// report is complete enough to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationReport {
    /// The value conforms.
    Valid,
    /// The value does not conform; at least one violation is present.
    Invalid(Vec<Violation>),
}

impl ValidationReport {
    /// Build a report from collected violations; an empty list is `Valid`.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        if violations.is_empty() {
            ValidationReport::Valid
        } else {
            ValidationReport::Invalid(violations)
        }
    }

    /// Whether the value conformed.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationReport::Valid)
    }

    /// The violations, empty when valid.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationReport::Valid => &[],
            ValidationReport::Invalid(violations) => violations,
        }
    }

    /// Consume the report, yielding its violations (empty when valid).
    pub fn into_violations(self) -> Vec<Violation> {
        match self {
            ValidationReport::Valid => Vec::new(),
            ValidationReport::Invalid(violations) => violations,
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReport::Valid => f.write_str("valid"),
            ValidationReport::Invalid(violations) => {
                writeln!(f, "{} violation(s):", violations.len())?;
                for violation in violations {
                    writeln!(f, "  {violation}")?;
                }
                Ok(())
            }
        }
    }
}

/// A compact, bounded-length summary of a runtime value for diagnostics.
///
/// Scalars render as themselves (long strings truncated); containers render
/// as their kind and size, never their contents.
pub fn value_summary(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 40 {
                let head: String = s.chars().take(40).collect();
                format!("{head:?}…")
            } else {
                format!("{s:?}")
            }
        }
        Value::Array(items) => format!("array of {}", items.len()),
        Value::Object(map) => format!("object with {} field(s)", map.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_display_is_json_pointer_style() {
        let path = ValuePath::root().child_field("items").child_index(2).child_field("status");
        assert_eq!(path.to_string(), "/items/2/status");
        assert_eq!(ValuePath::root().to_string(), "/");
    }

    #[test]
    fn empty_violations_collapse_to_valid() {
        assert!(ValidationReport::from_violations(vec![]).is_valid());
        let report = ValidationReport::from_violations(vec![Violation::mismatch(
            ValuePath::root(),
            "integer",
            &json!("x"),
        )]);
        assert!(!report.is_valid());
        assert_eq!(report.violations().len(), 1);
    }

    #[test]
    fn violation_display_names_path_and_expectation() {
        let violation = Violation::mismatch(
            ValuePath::root().child_field("age"),
            "integer",
            &json!("young"),
        );
        let msg = violation.to_string();
        assert!(msg.contains("/age"));
        assert!(msg.contains("integer"));
        assert!(msg.contains("young"));
    }

    #[test]
    fn value_summaries_stay_bounded() {
        assert_eq!(value_summary(&json!(null)), "null");
        assert_eq!(value_summary(&json!(42)), "42");
        assert_eq!(value_summary(&json!("ok")), "\"ok\"");
        assert_eq!(value_summary(&json!([1, 2, 3])), "array of 3");
        assert_eq!(value_summary(&json!({"a": 1})), "object with 1 field(s)");
        let long = "x".repeat(100);
        assert!(value_summary(&json!(long)).len() < 60);
    }
}
