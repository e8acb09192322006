//! The fabrication engine.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

use shapecast_core::{PrimitiveKind, Shape, ShapeError, ShapeRegistry};

/// Generation policy: value bounds, presence probabilities, and the
/// recursion budget.
///
/// Defaults: depth 8, optionals present 80% of the time, nullables null 20%
/// of the time, arrays of 0–3 elements, text of 1–12 alphanumeric
/// characters, integers within ±1000, floats within ±1000.0.
#[derive(Debug, Clone)]
pub struct FabricateLimits {
    /// Nesting depth beyond which terminal choices are forced (optionals
    /// omitted, nullables null, arrays empty, unions pick their first
    /// variant) so fabrication of self-referential shapes terminates.
    pub max_depth: usize,
    /// Probability that an optional object field is produced.
    pub optional_present: f64,
    /// Probability that a nullable fabricates as null.
    pub nullable_null: f64,
    /// Upper bound on fabricated array lengths.
    pub max_array_len: usize,
    /// Upper bound on fabricated text lengths.
    pub max_text_len: usize,
    /// Magnitude bound on fabricated integers.
    pub int_magnitude: i64,
    /// Magnitude bound on fabricated floats.
    pub float_magnitude: f64,
}

impl Default for FabricateLimits {
    fn default() -> Self {
        Self {
            max_depth: 8,
            optional_present: 0.8,
            nullable_null: 0.2,
            max_array_len: 3,
            max_text_len: 12,
            int_magnitude: 1000,
            float_magnitude: 1000.0,
        }
    }
}

impl FabricateLimits {
    /// Absolute ceiling on nesting. Forced terminal choices shrink every
    /// cycle that passes through an optional, nullable, array, or union
    /// edge; a shape recursive through required structure only hits this
    /// ceiling and fails with [`ShapeError::DepthExceeded`].
    fn hard_cap(&self) -> usize {
        self.max_depth * 4 + 16
    }
}

/// Per-call fabrication state: the random source and the depth counter.
///
/// Contexts are never shared across concurrent calls; build one per call.
/// Two contexts with the same seed drive identical fabrications.
#[derive(Debug, Clone)]
pub struct FabricationContext {
    rng: StdRng,
    depth: usize,
}

impl FabricationContext {
    /// A reproducible context: the same seed yields the same draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            depth: 0,
        }
    }

    /// A context seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            depth: 0,
        }
    }
}

/// Fabricates conforming values for shapes, resolving references through a
/// shared [`ShapeRegistry`].
#[derive(Debug, Clone)]
pub struct Fabricator<'a> {
    shapes: &'a ShapeRegistry,
    limits: FabricateLimits,
}

impl<'a> Fabricator<'a> {
    /// Create a fabricator over a registry with default limits.
    pub fn new(shapes: &'a ShapeRegistry) -> Self {
        Self {
            shapes,
            limits: FabricateLimits::default(),
        }
    }

    /// Replace the generation limits.
    pub fn with_limits(mut self, limits: FabricateLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The active generation limits.
    pub fn limits(&self) -> &FabricateLimits {
        &self.limits
    }

    /// Fabricate a value conforming to `shape`.
    ///
    /// # Errors
    ///
    /// [`ShapeError::UnknownShape`] for a reference the registry does not
    /// define (only reachable with an unverified registry), and
    /// [`ShapeError::DepthExceeded`] for a shape recursive through required
    /// structure, which has no finite conforming value.
    pub fn fabricate(
        &self,
        shape: &Shape,
        ctx: &mut FabricationContext,
    ) -> Result<Value, ShapeError> {
        self.build(shape, ctx)
    }

    fn build(&self, shape: &Shape, ctx: &mut FabricationContext) -> Result<Value, ShapeError> {
        if ctx.depth > self.limits.hard_cap() {
            return Err(ShapeError::DepthExceeded { depth: ctx.depth });
        }
        ctx.depth += 1;
        let result = self.build_inner(shape, ctx);
        ctx.depth -= 1;
        result
    }

    fn build_inner(
        &self,
        shape: &Shape,
        ctx: &mut FabricationContext,
    ) -> Result<Value, ShapeError> {
        let forced = ctx.depth > self.limits.max_depth;
        match shape {
            Shape::Primitive(kind) => Ok(self.primitive(*kind, ctx)),
            Shape::Literal(literal) => Ok(literal.to_value()),
            Shape::LiteralUnion(members) => {
                // Non-empty by construction.
                let index = ctx.rng.gen_range(0..members.len());
                Ok(members[index].to_value())
            }
            // Outside object-field position absence is not representable;
            // a bare optional fabricates its inner value.
            Shape::Optional(inner) => self.build(inner, ctx),
            Shape::Nullable(inner) => {
                if forced || ctx.rng.gen_bool(self.limits.nullable_null.clamp(0.0, 1.0)) {
                    Ok(Value::Null)
                } else {
                    self.build(inner, ctx)
                }
            }
            Shape::Array(element) => {
                let len = if forced {
                    0
                } else {
                    ctx.rng.gen_range(0..=self.limits.max_array_len)
                };
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.build(element, ctx)?);
                }
                Ok(Value::Array(items))
            }
            Shape::Object(fields) => {
                let mut map = Map::new();
                for field in fields {
                    let resolved = self.shapes.resolve(&field.shape)?;
                    if let Shape::Optional(inner) = resolved {
                        let present = !forced
                            && ctx
                                .rng
                                .gen_bool(self.limits.optional_present.clamp(0.0, 1.0));
                        if present {
                            map.insert(field.name.clone(), self.build(inner, ctx)?);
                        }
                    } else {
                        map.insert(field.name.clone(), self.build(&field.shape, ctx)?);
                    }
                }
                Ok(Value::Object(map))
            }
            Shape::Union(variants) => {
                // Non-empty by construction.
                let index = if forced {
                    0
                } else {
                    ctx.rng.gen_range(0..variants.len())
                };
                self.build(&variants[index], ctx)
            }
            Shape::Ref(_) => {
                let resolved = self.shapes.resolve(shape)?;
                self.build(resolved, ctx)
            }
        }
    }

    fn primitive(&self, kind: PrimitiveKind, ctx: &mut FabricationContext) -> Value {
        match kind {
            PrimitiveKind::Boolean => Value::Bool(ctx.rng.gen_bool(0.5)),
            PrimitiveKind::Integer => {
                let magnitude = self.limits.int_magnitude.abs();
                Value::from(ctx.rng.gen_range(-magnitude..=magnitude))
            }
            PrimitiveKind::Float => {
                let magnitude = self.limits.float_magnitude.abs();
                let drawn = if magnitude == 0.0 {
                    0.0
                } else {
                    ctx.rng.gen_range(-magnitude..magnitude)
                };
                Value::from(drawn)
            }
            PrimitiveKind::Text => {
                let len = ctx.rng.gen_range(1..=self.limits.max_text_len.max(1));
                let text: String = (0..len)
                    .map(|_| ctx.rng.sample(Alphanumeric) as char)
                    .collect();
                Value::String(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shapecast_validate::Validator;
    use std::collections::HashSet;

    fn fabricate_with_seed(shape: &Shape, seed: u64) -> Value {
        let registry = ShapeRegistry::new();
        let fabricator = Fabricator::new(&registry);
        let mut ctx = FabricationContext::seeded(seed);
        fabricator.fabricate(shape, &mut ctx).unwrap()
    }

    #[test]
    fn same_seed_same_output() {
        let shape = Shape::object([
            ("id", Shape::text()),
            ("score", Shape::float()),
            ("tags", Shape::array(Shape::text())),
            ("flag", Shape::optional(Shape::boolean())),
        ])
        .unwrap();
        for seed in [0_u64, 1, 42, u64::MAX] {
            assert_eq!(
                fabricate_with_seed(&shape, seed),
                fabricate_with_seed(&shape, seed),
                "seed {seed} must reproduce its fabrication"
            );
        }
    }

    #[test]
    fn literal_fabricates_its_fixed_value() {
        assert_eq!(fabricate_with_seed(&Shape::literal("A"), 7), json!("A"));
        assert_eq!(fabricate_with_seed(&Shape::literal(9_i64), 7), json!(9));
    }

    #[test]
    fn literal_union_stays_closed_and_covers_all_members() {
        let shape = Shape::literal_union(["A", "B", "C"]).unwrap();
        let mut seen: HashSet<String> = HashSet::new();
        for seed in 0..100 {
            let value = fabricate_with_seed(&shape, seed);
            let member = value.as_str().expect("literal union member is text");
            assert!(
                ["A", "B", "C"].contains(&member),
                "fabricated {member:?} outside the union"
            );
            seen.insert(member.to_string());
        }
        // Over 100 seeds no member stays permanently excluded.
        assert_eq!(seen.len(), 3, "expected all members to appear, saw {seen:?}");
    }

    #[test]
    fn integers_stay_within_magnitude() {
        for seed in 0..50 {
            let value = fabricate_with_seed(&Shape::integer(), seed);
            let n = value.as_i64().expect("fabricated integer is i64");
            assert!(n.abs() <= 1000);
        }
    }

    #[test]
    fn text_lengths_stay_bounded_and_printable() {
        for seed in 0..50 {
            let value = fabricate_with_seed(&Shape::text(), seed);
            let s = value.as_str().unwrap();
            assert!(!s.is_empty() && s.len() <= 12);
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn array_lengths_stay_bounded() {
        let shape = Shape::array(Shape::integer());
        let mut lengths: HashSet<usize> = HashSet::new();
        for seed in 0..100 {
            let value = fabricate_with_seed(&shape, seed);
            let len = value.as_array().unwrap().len();
            assert!(len <= 3);
            lengths.insert(len);
        }
        assert!(lengths.len() > 1, "length draws should vary across seeds");
    }

    #[test]
    fn optional_fields_are_sometimes_absent_sometimes_present() {
        let shape = Shape::object([("note", Shape::optional(Shape::text()))]).unwrap();
        let mut present = 0;
        let mut absent = 0;
        for seed in 0..200 {
            let value = fabricate_with_seed(&shape, seed);
            match value.get("note") {
                Some(_) => present += 1,
                None => absent += 1,
            }
        }
        assert!(present > 0 && absent > 0, "presence policy must bias, not fix");
        assert!(present > absent, "default presence bias is toward present");
    }

    #[test]
    fn nullable_draws_null_with_configured_bias() {
        let shape = Shape::nullable(Shape::integer());
        let mut nulls = 0;
        for seed in 0..200 {
            if fabricate_with_seed(&shape, seed).is_null() {
                nulls += 1;
            }
        }
        assert!(nulls > 0, "nullable must sometimes draw null");
        assert!(nulls < 200, "nullable must sometimes draw the inner value");
    }

    #[test]
    fn recursive_shape_terminates_and_validates() {
        let mut registry = ShapeRegistry::new();
        registry
            .define(
                "node",
                Shape::object([
                    ("label", Shape::text()),
                    ("children", Shape::array(Shape::reference("node"))),
                ])
                .unwrap(),
            )
            .unwrap();
        registry.verify().unwrap();

        let fabricator = Fabricator::new(&registry);
        let validator = Validator::new(&registry);
        let shape = Shape::reference("node");
        for seed in 0..30 {
            let mut ctx = FabricationContext::seeded(seed);
            let value = fabricator.fabricate(&shape, &mut ctx).unwrap();
            assert!(
                validator.validate(&shape, &value).is_valid(),
                "seed {seed} fabricated a non-conforming tree: {value}"
            );
        }
    }

    #[test]
    fn shape_recursive_through_required_structure_is_rejected() {
        let mut registry = ShapeRegistry::new();
        // Every "pair" requires another "pair": no finite value exists.
        registry
            .define(
                "pair",
                Shape::object([("next", Shape::reference("pair"))]).unwrap(),
            )
            .unwrap();
        let fabricator = Fabricator::new(&registry);
        let mut ctx = FabricationContext::seeded(1);
        let err = fabricator
            .fabricate(&Shape::reference("pair"), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, ShapeError::DepthExceeded { .. }));
    }

    #[test]
    fn unknown_ref_is_an_error_not_a_panic() {
        let registry = ShapeRegistry::new();
        let fabricator = Fabricator::new(&registry);
        let mut ctx = FabricationContext::seeded(1);
        let err = fabricator
            .fabricate(&Shape::reference("ghost"), &mut ctx)
            .unwrap_err();
        assert!(matches!(err, ShapeError::UnknownShape(name) if name == "ghost"));
    }
}
