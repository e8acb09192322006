//! Endpoint descriptions and the endpoint catalog.
//!
//! An [`Endpoint`] pairs an identifier and an HTTP verb/path with the
//! request and response shapes governing its calls. The catalog is explicit
//! configuration data — built in code or loaded from an `endpoints.json`
//! file whose request/response members are shape declarations (typically
//! references into the shared registry):
//!
//! ```json
//! { "get-user": {
//!     "method": "GET",
//!     "path": "/api/users/current",
//!     "response": { "kind": "ref", "name": "user" } } }
//! ```
//!
//! Every shape reference is verified against the registry when the catalog
//! is built, so a dangling reference fails construction, never a call.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shapecast_core::{Shape, ShapeDecl, ShapeRegistry};

use crate::error::CatalogError;

/// The HTTP verbs endpoints may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET.
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP DELETE.
    Delete,
}

impl Method {
    /// The canonical uppercase verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One callable endpoint: identifier, verb, path, and its shape contract.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Catalog-unique identifier, e.g. `get-user`.
    pub id: String,
    /// HTTP verb.
    pub method: Method,
    /// Path joined onto the client's base URL.
    pub path: String,
    /// Shape the caller's arguments must satisfy; `None` for endpoints
    /// taking no arguments.
    pub request: Option<Shape>,
    /// Shape the response must satisfy.
    pub response: Shape,
}

/// Declarative form of an endpoint, as written in `endpoints.json`.
#[derive(Debug, Deserialize)]
struct EndpointDecl {
    method: Method,
    path: String,
    #[serde(default)]
    request: Option<ShapeDecl>,
    response: ShapeDecl,
}

/// Identifier → [`Endpoint`] map with construction-time shape checking.
#[derive(Debug, Clone, Default)]
pub struct EndpointCatalog {
    endpoints: HashMap<String, Endpoint>,
}

impl EndpointCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint, verifying its shapes against the registry.
    ///
    /// # Errors
    ///
    /// [`CatalogError::DuplicateEndpoint`] for a repeated identifier and
    /// [`CatalogError::Malformed`] when a request/response shape references
    /// a name the registry does not define.
    pub fn define(
        &mut self,
        endpoint: Endpoint,
        shapes: &ShapeRegistry,
    ) -> Result<(), CatalogError> {
        if self.endpoints.contains_key(&endpoint.id) {
            return Err(CatalogError::DuplicateEndpoint { id: endpoint.id });
        }
        if let Some(request) = &endpoint.request {
            shapes
                .verify_shape(request)
                .map_err(|source| CatalogError::Malformed {
                    id: endpoint.id.clone(),
                    source,
                })?;
        }
        shapes
            .verify_shape(&endpoint.response)
            .map_err(|source| CatalogError::Malformed {
                id: endpoint.id.clone(),
                source,
            })?;
        self.endpoints.insert(endpoint.id.clone(), endpoint);
        Ok(())
    }

    /// Load a catalog from a JSON file mapping endpoint identifiers to
    /// declarations, verifying every shape against the registry.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Load`] for unreadable or unparseable files, plus the
    /// errors [`EndpointCatalog::define`] reports.
    pub fn load_file(
        path: impl AsRef<Path>,
        shapes: &ShapeRegistry,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Load {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let decls: BTreeMap<String, EndpointDecl> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Load {
                path: display.clone(),
                reason: e.to_string(),
            })?;

        let mut catalog = Self::new();
        for (id, decl) in decls {
            let request = decl
                .request
                .map(ShapeDecl::into_shape)
                .transpose()
                .map_err(|source| CatalogError::Malformed {
                    id: id.clone(),
                    source,
                })?;
            let response = decl
                .response
                .into_shape()
                .map_err(|source| CatalogError::Malformed {
                    id: id.clone(),
                    source,
                })?;
            catalog.define(
                Endpoint {
                    id,
                    method: decl.method,
                    path: decl.path,
                    request,
                    response,
                },
                shapes,
            )?;
        }
        Ok(catalog)
    }

    /// Look up an endpoint by identifier.
    pub fn get(&self, id: &str) -> Option<&Endpoint> {
        self.endpoints.get(id)
    }

    /// All endpoint identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
