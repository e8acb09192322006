//! # Shape Registry
//!
//! Named shapes, loaded once at startup and shared read-only for the process
//! lifetime. The registry is what gives [`Shape::Ref`] meaning: references
//! (including self-references, which is how recursive shapes are expressed)
//! resolve against the registry's name map.
//!
//! [`ShapeRegistry::verify`] is the construction-time gate: every reference
//! reachable from a defined shape must resolve, and pure reference chains
//! must terminate. A registry built through [`ShapeRegistry::load_dir`] is
//! verified before it is returned, so resolution failures cannot surface
//! later during validation or fabrication.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::decl::ShapeDecl;
use crate::error::{MalformedShape, ShapeError};
use crate::shape::Shape;

/// File suffix recognized by [`ShapeRegistry::load_dir`].
const SHAPE_FILE_SUFFIX: &str = ".shape.json";

/// A name → [`Shape`] map with reference resolution.
#[derive(Debug, Clone, Default)]
pub struct ShapeRegistry {
    shapes: HashMap<String, Shape>,
}

impl ShapeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape under a name.
    ///
    /// # Errors
    ///
    /// [`ShapeError::DuplicateShape`] when the name is already taken —
    /// silent redefinition of a shared shape is always a mistake.
    pub fn define(&mut self, name: impl Into<String>, shape: Shape) -> Result<(), ShapeError> {
        let name = name.into();
        if self.shapes.contains_key(&name) {
            return Err(ShapeError::DuplicateShape(name));
        }
        self.shapes.insert(name, shape);
        Ok(())
    }

    /// Load every `*.shape.json` file under `dir` (recursively), registering
    /// each shape under its file stem (`user.shape.json` → `user`), then
    /// verify the result.
    ///
    /// # Errors
    ///
    /// [`ShapeError::Load`] for unreadable, unparseable, or malformed
    /// definitions; [`ShapeError::Malformed`] when a reference does not
    /// resolve within the loaded set.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ShapeError> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        collect_shape_files(dir, &mut files)?;
        files.sort();

        let mut registry = Self::new();
        for path in files {
            let display = path.display().to_string();
            let content = fs::read_to_string(&path).map_err(|e| ShapeError::Load {
                path: display.clone(),
                reason: e.to_string(),
            })?;
            let decl = ShapeDecl::parse(&content).map_err(|e| ShapeError::Load {
                path: display.clone(),
                reason: e.to_string(),
            })?;
            let shape = decl.into_shape().map_err(|e| ShapeError::Load {
                path: display.clone(),
                reason: e.to_string(),
            })?;
            let name = shape_name_from(&path).ok_or_else(|| ShapeError::Load {
                path: display.clone(),
                reason: "file name is not valid UTF-8".to_string(),
            })?;
            registry.define(name, shape).map_err(|e| ShapeError::Load {
                path: display,
                reason: e.to_string(),
            })?;
        }

        registry.verify()?;
        Ok(registry)
    }

    /// Look up a shape by name.
    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.shapes.get(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.shapes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Verify every shape in the registry: all reachable references resolve
    /// and pure reference chains terminate in structure.
    ///
    /// # Errors
    ///
    /// [`MalformedShape::UnresolvedRef`] or [`MalformedShape::CyclicRef`].
    pub fn verify(&self) -> Result<(), MalformedShape> {
        for shape in self.shapes.values() {
            self.verify_shape(shape)?;
        }
        Ok(())
    }

    /// Verify an arbitrary shape against this registry — every reference in
    /// its tree must resolve here. Used by consumers (endpoint catalogs,
    /// ad-hoc shapes) to get the same construction-time guarantee as
    /// registered shapes.
    ///
    /// # Errors
    ///
    /// [`MalformedShape::UnresolvedRef`] or [`MalformedShape::CyclicRef`].
    pub fn verify_shape(&self, shape: &Shape) -> Result<(), MalformedShape> {
        let mut stack = vec![shape];
        let mut chased: HashSet<&str> = HashSet::new();
        while let Some(current) = stack.pop() {
            match current {
                Shape::Optional(inner) | Shape::Nullable(inner) | Shape::Array(inner) => {
                    stack.push(inner);
                }
                Shape::Object(fields) => stack.extend(fields.iter().map(|f| &f.shape)),
                Shape::Union(variants) => stack.extend(variants.iter()),
                Shape::Ref(name) => {
                    // Each ref name is chased once; its target is walked so
                    // references buried inside referenced shapes are checked
                    // too, and the dedup set keeps cycles finite.
                    if chased.insert(name.as_str()) {
                        stack.push(self.chase(name)?);
                    }
                }
                Shape::Primitive(_) | Shape::Literal(_) | Shape::LiteralUnion(_) => {}
            }
        }
        Ok(())
    }

    /// Follow a reference chain until it reaches a non-reference shape.
    ///
    /// # Errors
    ///
    /// [`ShapeError::UnknownShape`] for a dangling reference (only possible
    /// on an unverified registry) and [`ShapeError::Malformed`] for a pure
    /// reference cycle.
    pub fn resolve<'a>(&'a self, mut shape: &'a Shape) -> Result<&'a Shape, ShapeError> {
        let mut hops = 0;
        while let Shape::Ref(name) = shape {
            shape = self
                .shapes
                .get(name)
                .ok_or_else(|| ShapeError::UnknownShape(name.clone()))?;
            hops += 1;
            if hops > self.shapes.len() {
                return Err(ShapeError::Malformed(MalformedShape::CyclicRef {
                    name: name.clone(),
                }));
            }
        }
        Ok(shape)
    }

    /// Follow a reference chain from a name, rejecting dangling names and
    /// cycles that never reach structure.
    fn chase(&self, start: &str) -> Result<&Shape, MalformedShape> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut name = start;
        loop {
            if !visited.insert(name) {
                return Err(MalformedShape::CyclicRef {
                    name: start.to_string(),
                });
            }
            match self.shapes.get(name) {
                None => {
                    return Err(MalformedShape::UnresolvedRef {
                        name: name.to_string(),
                    })
                }
                Some(Shape::Ref(next)) => name = next,
                Some(shape) => return Ok(shape),
            }
        }
    }
}

/// Derive the registry name from a shape file path.
fn shape_name_from(path: &Path) -> Option<String> {
    let file = path.file_name()?.to_str()?;
    file.strip_suffix(SHAPE_FILE_SUFFIX).map(str::to_string)
}

/// Recursively collect `*.shape.json` paths.
fn collect_shape_files(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), ShapeError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_shape_files(&path, acc)?;
        } else if path
            .file_name()
            .and_then(|f| f.to_str())
            .is_some_and(|name| name.ends_with(SHAPE_FILE_SUFFIX))
        {
            acc.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(defs: &[(&str, Shape)]) -> ShapeRegistry {
        let mut registry = ShapeRegistry::new();
        for (name, shape) in defs {
            registry.define(*name, shape.clone()).unwrap();
        }
        registry
    }

    #[test]
    fn define_rejects_duplicates() {
        let mut registry = ShapeRegistry::new();
        registry.define("user", Shape::text()).unwrap();
        let err = registry.define("user", Shape::integer()).unwrap_err();
        assert!(matches!(err, ShapeError::DuplicateShape(name) if name == "user"));
    }

    #[test]
    fn verify_accepts_resolvable_refs() {
        let registry = registry_with(&[
            ("id", Shape::text()),
            (
                "user",
                Shape::object([("id", Shape::reference("id"))]).unwrap(),
            ),
        ]);
        assert!(registry.verify().is_ok());
    }

    #[test]
    fn verify_rejects_dangling_ref() {
        let registry = registry_with(&[(
            "user",
            Shape::object([("id", Shape::reference("nonexistent"))]).unwrap(),
        )]);
        assert_eq!(
            registry.verify().unwrap_err(),
            MalformedShape::UnresolvedRef {
                name: "nonexistent".into()
            }
        );
    }

    #[test]
    fn verify_rejects_pure_ref_cycle() {
        let registry = registry_with(&[
            ("a", Shape::reference("b")),
            ("b", Shape::reference("a")),
        ]);
        assert!(matches!(
            registry.verify().unwrap_err(),
            MalformedShape::CyclicRef { .. }
        ));
    }

    #[test]
    fn self_reference_through_structure_is_legal() {
        // A tree node whose children are more tree nodes.
        let registry = registry_with(&[(
            "node",
            Shape::object([
                ("label", Shape::text()),
                ("children", Shape::array(Shape::reference("node"))),
            ])
            .unwrap(),
        )]);
        assert!(registry.verify().is_ok());
    }

    #[test]
    fn resolve_follows_ref_chains() {
        let registry = registry_with(&[
            ("id", Shape::text()),
            ("user-id", Shape::reference("id")),
        ]);
        let shape = Shape::reference("user-id");
        assert_eq!(registry.resolve(&shape).unwrap(), &Shape::text());
    }

    #[test]
    fn resolve_reports_unknown_names() {
        let registry = ShapeRegistry::new();
        let shape = Shape::reference("ghost");
        assert!(matches!(
            registry.resolve(&shape).unwrap_err(),
            ShapeError::UnknownShape(name) if name == "ghost"
        ));
    }

    #[test]
    fn load_dir_registers_by_file_stem() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("status.shape.json"),
            r#"{ "kind": "literal-union", "values": ["A", "B", "C"] }"#,
        )
        .unwrap();
        let nested = tmp.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            nested.join("user.shape.json"),
            r#"{ "kind": "object", "fields": {
                "name": { "kind": "text" },
                "status": { "kind": "ref", "name": "status" } } }"#,
        )
        .unwrap();
        // A file without the suffix is ignored.
        std::fs::write(tmp.path().join("README.md"), "not a shape").unwrap();

        let registry = ShapeRegistry::load_dir(tmp.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["status", "user"]);
        assert!(registry.get("user").is_some());
    }

    #[test]
    fn load_dir_rejects_unparseable_definitions() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("bad.shape.json"), "{ not json").unwrap();
        let err = ShapeRegistry::load_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, ShapeError::Load { path, .. } if path.contains("bad.shape.json")));
    }

    #[test]
    fn load_dir_rejects_dangling_refs_at_load_time() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("order.shape.json"),
            r#"{ "kind": "ref", "name": "customer" }"#,
        )
        .unwrap();
        let err = ShapeRegistry::load_dir(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Malformed(MalformedShape::UnresolvedRef { name }) if name == "customer"
        ));
    }

    #[test]
    fn load_dir_rejects_malformed_definitions() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("empty.shape.json"),
            r#"{ "kind": "literal-union", "values": [] }"#,
        )
        .unwrap();
        let err = ShapeRegistry::load_dir(tmp.path()).unwrap_err();
        assert!(matches!(err, ShapeError::Load { .. }));
    }
}
