//! The validator engine.

use serde_json::Value;

use shapecast_core::{
    PrimitiveKind, Shape, ShapeRegistry, ValidationReport, ValuePath, Violation, ViolationKind,
};

/// Policy for object fields present in the value but absent from the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectPolicy {
    /// Undeclared fields are violations.
    Strict,
    /// Undeclared fields are ignored.
    #[default]
    Lenient,
}

/// Validates runtime values against shapes, resolving references through a
/// shared [`ShapeRegistry`].
///
/// The validator borrows the registry read-only and holds no per-call state,
/// so one validator (or many) can serve concurrent call sites.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    shapes: &'a ShapeRegistry,
    policy: ObjectPolicy,
}

impl<'a> Validator<'a> {
    /// Create a validator over a registry with the default (lenient) object
    /// policy.
    ///
    /// References inside validated shapes must resolve in `shapes`; a
    /// registry built through its loading/verification paths guarantees
    /// that. An unresolved reference reaching the validator anyway is
    /// reported as a violation, never a panic.
    pub fn new(shapes: &'a ShapeRegistry) -> Self {
        Self {
            shapes,
            policy: ObjectPolicy::default(),
        }
    }

    /// Set the object policy.
    pub fn with_policy(mut self, policy: ObjectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The active object policy.
    pub fn policy(&self) -> ObjectPolicy {
        self.policy
    }

    /// Validate `value` against `shape`, collecting every violation.
    pub fn validate(&self, shape: &Shape, value: &Value) -> ValidationReport {
        let mut violations = Vec::new();
        self.check(shape, value, &ValuePath::root(), &mut violations, &mut Vec::new());
        ValidationReport::from_violations(violations)
    }

    /// The index of the first declared union variant that accepts `value`,
    /// or `None` when every variant rejects it.
    pub fn matching_variant(&self, variants: &[Shape], value: &Value) -> Option<usize> {
        variants.iter().position(|variant| {
            let mut scratch = Vec::new();
            self.check(variant, value, &ValuePath::root(), &mut scratch, &mut Vec::new());
            scratch.is_empty()
        })
    }

    /// `chain` holds the reference names entered since the last descent into
    /// value structure (array element or object field). Re-entering one of
    /// them without consuming structure can never make progress, so that
    /// branch is reported instead of recursed — this keeps validation total
    /// for reference cycles running through unions, optionals, or nullables.
    fn check(
        &self,
        shape: &Shape,
        value: &Value,
        path: &ValuePath,
        out: &mut Vec<Violation>,
        chain: &mut Vec<String>,
    ) {
        match shape {
            Shape::Primitive(kind) => {
                if !conforms_primitive(*kind, value) {
                    out.push(Violation::mismatch(path.clone(), kind.name(), value));
                }
            }
            Shape::Literal(literal) => {
                if !literal.matches(value) {
                    out.push(Violation::mismatch(path.clone(), literal.to_string(), value));
                }
            }
            Shape::LiteralUnion(members) => {
                if !members.iter().any(|member| member.matches(value)) {
                    out.push(Violation::mismatch(path.clone(), shape.summary(), value));
                }
            }
            // Absence is handled at the object-field site; a value that is
            // present must satisfy the inner shape.
            Shape::Optional(inner) => self.check(inner, value, path, out, chain),
            Shape::Nullable(inner) => {
                if !value.is_null() {
                    self.check(inner, value, path, out, chain);
                }
            }
            Shape::Array(element) => match value.as_array() {
                Some(items) => {
                    let saved = std::mem::take(chain);
                    for (index, item) in items.iter().enumerate() {
                        self.check(element, item, &path.child_index(index), out, chain);
                    }
                    *chain = saved;
                }
                None => out.push(Violation::mismatch(path.clone(), shape.summary(), value)),
            },
            Shape::Object(fields) => match value.as_object() {
                Some(map) => {
                    let saved = std::mem::take(chain);
                    for field in fields {
                        let field_path = path.child_field(&field.name);
                        match map.get(&field.name) {
                            Some(field_value) => {
                                self.check(&field.shape, field_value, &field_path, out, chain)
                            }
                            None => {
                                if !self.allows_absence(&field.shape) {
                                    out.push(Violation::missing_field(
                                        field_path,
                                        field.shape.summary(),
                                    ));
                                }
                            }
                        }
                    }
                    *chain = saved;
                    if self.policy == ObjectPolicy::Strict {
                        for (name, field_value) in map {
                            if fields.iter().all(|f| &f.name != name) {
                                out.push(Violation::unexpected_field(
                                    path.child_field(name),
                                    field_value,
                                ));
                            }
                        }
                    }
                }
                None => out.push(Violation::mismatch(path.clone(), shape.summary(), value)),
            },
            Shape::Union(variants) => {
                let mut last = Vec::new();
                for variant in variants {
                    let mut scratch = Vec::new();
                    self.check(variant, value, path, &mut scratch, chain);
                    if scratch.is_empty() {
                        return;
                    }
                    last = scratch;
                }
                out.append(&mut last);
                out.push(Violation::no_union_variant(
                    path.clone(),
                    shape.summary(),
                    value,
                ));
            }
            Shape::Ref(name) => {
                if chain.iter().any(|entered| entered == name) {
                    out.push(Violation {
                        path: path.clone(),
                        expected: format!("&{name}"),
                        actual: "cyclic reference without structure".to_string(),
                        kind: ViolationKind::Mismatch,
                    });
                } else {
                    match self.shapes.get(name) {
                        Some(resolved) => {
                            chain.push(name.clone());
                            self.check(resolved, value, path, out, chain);
                            chain.pop();
                        }
                        None => out.push(Violation {
                            path: path.clone(),
                            expected: format!("&{name}"),
                            actual: "unresolved reference".to_string(),
                            kind: ViolationKind::Mismatch,
                        }),
                    }
                }
            }
        }
    }

    /// Whether an absent object field satisfies this field shape. Follows
    /// references so a field declared as `&maybe-id` → `optional<text>` may
    /// still be omitted.
    fn allows_absence(&self, shape: &Shape) -> bool {
        self.shapes
            .resolve(shape)
            .map(Shape::is_optional)
            .unwrap_or(false)
    }
}

/// Runtime kind check for primitives. Integer-kind accepts any number with a
/// zero fractional component (`5` and `5.0` conform, `5.5` does not).
fn conforms_primitive(kind: PrimitiveKind, value: &Value) -> bool {
    match kind {
        PrimitiveKind::Boolean => value.is_boolean(),
        PrimitiveKind::Text => value.is_string(),
        PrimitiveKind::Integer => value
            .as_f64()
            .is_some_and(|f| f.is_finite() && f.fract() == 0.0),
        PrimitiveKind::Float => value.as_f64().is_some_and(f64::is_finite),
    }
}
