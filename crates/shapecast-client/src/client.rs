//! The typed call client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use shapecast_core::{
    value_summary, Shape, ShapeError, ShapeRegistry, ValidationReport, ValuePath, Violation,
    ViolationKind,
};
use shapecast_fabricate::{FabricateLimits, FabricationContext, Fabricator};
use shapecast_validate::{ObjectPolicy, Validator};

use crate::config::ClientConfig;
use crate::endpoint::EndpointCatalog;
use crate::error::CallError;
use crate::transport::{HttpTransport, Transport};

/// The client's operating mode, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Calls go through the transport; responses are contract-checked.
    Live,
    /// Calls return fabricated conforming responses; the transport is never
    /// touched.
    Simulate,
}

/// Fabrication policy for a simulating client.
///
/// With a seed set, call `n` uses a context seeded with `seed + n`, so a
/// reconstructed client replays the same response sequence while successive
/// calls still differ.
#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Generation limits for fabricated responses.
    pub limits: FabricateLimits,
    /// Optional base seed for reproducible response sequences.
    pub seed: Option<u64>,
}

enum Backend {
    Live(Arc<dyn Transport>),
    Simulate {
        options: SimulateOptions,
        calls: AtomicU64,
    },
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Live(transport) => f.debug_tuple("Live").field(&transport.name()).finish(),
            Backend::Simulate { options, .. } => {
                f.debug_struct("Simulate").field("options", options).finish()
            }
        }
    }
}

/// Typed endpoint calls over a shape registry and an endpoint catalog.
///
/// The registry and catalog are immutable after construction; one client can
/// serve concurrent calls without coordination. Simulating clients carry
/// only a call counter (for seed derivation) as shared state.
#[derive(Debug)]
pub struct ShapeClient {
    shapes: Arc<ShapeRegistry>,
    catalog: EndpointCatalog,
    backend: Backend,
    policy: ObjectPolicy,
}

impl ShapeClient {
    /// A live client delegating to the given transport.
    ///
    /// # Errors
    ///
    /// [`CallError::Shape`] when the registry fails verification — the
    /// construction-time gate for unresolved references.
    pub fn live(
        transport: Arc<dyn Transport>,
        shapes: Arc<ShapeRegistry>,
        catalog: EndpointCatalog,
    ) -> Result<Self, CallError> {
        shapes.verify().map_err(ShapeError::from)?;
        Ok(Self {
            shapes,
            catalog,
            backend: Backend::Live(transport),
            policy: ObjectPolicy::default(),
        })
    }

    /// A simulating client: every call fabricates a conforming response and
    /// no transport exists to be called.
    ///
    /// # Errors
    ///
    /// [`CallError::Shape`] when the registry fails verification.
    pub fn simulate(
        shapes: Arc<ShapeRegistry>,
        catalog: EndpointCatalog,
        options: SimulateOptions,
    ) -> Result<Self, CallError> {
        shapes.verify().map_err(ShapeError::from)?;
        Ok(Self {
            shapes,
            catalog,
            backend: Backend::Simulate {
                options,
                calls: AtomicU64::new(0),
            },
            policy: ObjectPolicy::default(),
        })
    }

    /// Build a client from configuration: simulating when
    /// `config.simulate` is set, otherwise live over [`HttpTransport`].
    pub fn from_config(
        config: &ClientConfig,
        shapes: Arc<ShapeRegistry>,
        catalog: EndpointCatalog,
    ) -> Result<Self, CallError> {
        if config.simulate {
            Self::simulate(
                shapes,
                catalog,
                SimulateOptions {
                    limits: FabricateLimits::default(),
                    seed: config.fabricate_seed,
                },
            )
        } else {
            let transport = HttpTransport::new(config)?;
            Self::live(Arc::new(transport), shapes, catalog)
        }
    }

    /// Set the object policy used for request and response validation.
    pub fn with_policy(mut self, policy: ObjectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The client's operating mode.
    pub fn mode(&self) -> ClientMode {
        match self.backend {
            Backend::Live(_) => ClientMode::Live,
            Backend::Simulate { .. } => ClientMode::Simulate,
        }
    }

    /// The endpoint catalog this client serves.
    pub fn endpoints(&self) -> &EndpointCatalog {
        &self.catalog
    }

    /// Call an endpoint by identifier.
    ///
    /// Arguments are validated against the request shape in both modes and
    /// reject the call before any I/O. In live mode the response is
    /// validated against the response shape; in simulate mode a conforming
    /// response is fabricated instead.
    pub async fn call(
        &self,
        endpoint_id: &str,
        args: Option<&Value>,
    ) -> Result<Value, CallError> {
        let endpoint = self
            .catalog
            .get(endpoint_id)
            .ok_or_else(|| CallError::UnknownEndpoint(endpoint_id.to_string()))?;

        let validator = Validator::new(&self.shapes).with_policy(self.policy);
        self.check_request(endpoint_id, &validator, endpoint.request.as_ref(), args)?;

        match &self.backend {
            Backend::Live(transport) => {
                tracing::debug!(
                    endpoint = %endpoint.id,
                    method = %endpoint.method,
                    transport = transport.name(),
                    "dispatching live call"
                );
                let raw = transport.send(endpoint, args).await?;
                match validator.validate(&endpoint.response, &raw) {
                    ValidationReport::Valid => Ok(raw),
                    ValidationReport::Invalid(violations) => {
                        tracing::warn!(
                            endpoint = %endpoint.id,
                            count = violations.len(),
                            "response violated its declared shape"
                        );
                        Err(CallError::ContractViolation {
                            endpoint: endpoint.id.clone(),
                            violations,
                        })
                    }
                }
            }
            Backend::Simulate { options, calls } => {
                tracing::debug!(endpoint = %endpoint.id, "fabricating simulated response");
                let call_index = calls.fetch_add(1, Ordering::Relaxed);
                let mut ctx = match options.seed {
                    Some(seed) => FabricationContext::seeded(seed.wrapping_add(call_index)),
                    None => FabricationContext::from_entropy(),
                };
                let fabricator =
                    Fabricator::new(&self.shapes).with_limits(options.limits.clone());
                Ok(fabricator.fabricate(&endpoint.response, &mut ctx)?)
            }
        }
    }

    fn check_request(
        &self,
        endpoint_id: &str,
        validator: &Validator<'_>,
        request: Option<&Shape>,
        args: Option<&Value>,
    ) -> Result<(), CallError> {
        match (request, args) {
            (Some(shape), Some(value)) => match validator.validate(shape, value) {
                ValidationReport::Valid => Ok(()),
                ValidationReport::Invalid(violations) => Err(CallError::RequestRejected {
                    endpoint: endpoint_id.to_string(),
                    violations,
                }),
            },
            (Some(shape), None) => {
                let absent_ok = self
                    .shapes
                    .resolve(shape)
                    .map(Shape::is_optional)
                    .unwrap_or(false);
                if absent_ok {
                    Ok(())
                } else {
                    Err(CallError::RequestRejected {
                        endpoint: endpoint_id.to_string(),
                        violations: vec![Violation::missing_field(
                            ValuePath::root(),
                            shape.summary(),
                        )],
                    })
                }
            }
            (None, Some(value)) => Err(CallError::RequestRejected {
                endpoint: endpoint_id.to_string(),
                violations: vec![Violation {
                    path: ValuePath::root(),
                    expected: "no request arguments".to_string(),
                    actual: value_summary(value),
                    kind: ViolationKind::UnexpectedField,
                }],
            }),
            (None, None) => Ok(()),
        }
    }
}
