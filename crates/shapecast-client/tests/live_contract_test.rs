//! Contract tests for live-mode calls.
//!
//! A wiremock server stands in for the real backend. The properties under
//! test: conforming responses come back as values, non-conforming responses
//! become contract violations with full diagnostics, server failures pass
//! through as transport errors, and bad arguments never reach the wire.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shapecast_client::{
    CallError, ClientConfig, Endpoint, EndpointCatalog, HttpTransport, Method, ShapeClient,
    Transport, TransportError,
};
use shapecast_core::{Shape, ShapeRegistry};

fn registry() -> Arc<ShapeRegistry> {
    let mut registry = ShapeRegistry::new();
    registry
        .define(
            "user",
            Shape::object([
                ("id", Shape::text()),
                ("age", Shape::integer()),
                (
                    "status",
                    Shape::literal_union(["active", "blocked"]).unwrap(),
                ),
            ])
            .unwrap(),
        )
        .unwrap();
    Arc::new(registry)
}

fn catalog(shapes: &ShapeRegistry) -> EndpointCatalog {
    let mut catalog = EndpointCatalog::new();
    catalog
        .define(
            Endpoint {
                id: "get-user".into(),
                method: Method::Get,
                path: "/api/users/current".into(),
                request: None,
                response: Shape::reference("user"),
            },
            shapes,
        )
        .unwrap();
    catalog
        .define(
            Endpoint {
                id: "rename-user".into(),
                method: Method::Post,
                path: "/api/users/rename".into(),
                request: Some(Shape::object([("name", Shape::text())]).unwrap()),
                response: Shape::reference("user"),
            },
            shapes,
        )
        .unwrap();
    catalog
}

fn live_client(server: &MockServer) -> ShapeClient {
    let mut config = ClientConfig::local(1).unwrap();
    config.base_url = server.uri().parse().unwrap();
    let shapes = registry();
    let endpoints = catalog(&shapes);
    let transport = Arc::new(HttpTransport::new(&config).unwrap());
    ShapeClient::live(transport, shapes, endpoints).unwrap()
}

#[tokio::test]
async fn conforming_response_is_returned_as_a_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-77",
            "age": 29,
            "status": "active"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let value = client.call("get-user", None).await.unwrap();
    assert_eq!(value["id"], "u-77");
    assert_eq!(value["status"], "active");
}

#[tokio::test]
async fn non_conforming_response_is_a_contract_violation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-77",
            "age": "twenty-nine",
            "status": "parked"
        })))
        .mount(&server)
        .await;

    let client = live_client(&server);
    let err = client.call("get-user", None).await.unwrap_err();
    match err {
        CallError::ContractViolation {
            endpoint,
            violations,
        } => {
            assert_eq!(endpoint, "get-user");
            let paths: Vec<String> = violations.iter().map(|v| v.path.to_string()).collect();
            assert!(paths.contains(&"/age".to_string()), "paths: {paths:?}");
            assert!(paths.contains(&"/status".to_string()), "paths: {paths:?}");
        }
        other => panic!("expected ContractViolation, got: {other}"),
    }
}

#[tokio::test]
async fn server_failure_passes_through_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/current"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = live_client(&server);
    let err = client.call("get-user", None).await.unwrap_err();
    match err {
        CallError::Transport(TransportError::Status { status, body, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Transport(Status), got: {other}"),
    }
}

#[tokio::test]
async fn bad_arguments_reject_before_any_transport_activity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/rename"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let err = client
        .call("rename-user", Some(&json!({ "name": 42 })))
        .await
        .unwrap_err();
    match err {
        CallError::RequestRejected { violations, .. } => {
            assert_eq!(violations[0].path.to_string(), "/name");
        }
        other => panic!("expected RequestRejected, got: {other}"),
    }

    // Missing required arguments are rejected the same way.
    let err = client.call("rename-user", None).await.unwrap_err();
    assert!(matches!(err, CallError::RequestRejected { .. }));
}

#[tokio::test]
async fn request_payload_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/rename"))
        .and(body_json(json!({ "name": "Ada" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-77",
            "age": 29,
            "status": "active"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = live_client(&server);
    let value = client
        .call("rename-user", Some(&json!({ "name": "Ada" })))
        .await
        .unwrap();
    assert_eq!(value["id"], "u-77");
}

#[tokio::test]
async fn unknown_endpoint_is_reported() {
    let server = MockServer::start().await;
    let client = live_client(&server);
    let err = client.call("drop-user", None).await.unwrap_err();
    assert!(matches!(err, CallError::UnknownEndpoint(id) if id == "drop-user"));
}

// ── Custom transports ────────────────────────────────────────────────

/// A transport that answers from a fixed value and counts invocations.
struct CannedTransport {
    response: Value,
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for CannedTransport {
    async fn send(
        &self,
        _endpoint: &Endpoint,
        _payload: Option<&Value>,
    ) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "CannedTransport"
    }
}

#[tokio::test]
async fn live_mode_uses_the_injected_transport_once_per_call() {
    let shapes = registry();
    let endpoints = catalog(&shapes);
    let transport = Arc::new(CannedTransport {
        response: json!({ "id": "u-1", "age": 40, "status": "blocked" }),
        calls: AtomicUsize::new(0),
    });
    let client = ShapeClient::live(transport.clone(), shapes, endpoints).unwrap();

    let value = client.call("get-user", None).await.unwrap();
    assert_eq!(value["age"], 40);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    // A canned response that breaks the contract still counts one send and
    // surfaces as a violation, with no retry.
    let shapes = registry();
    let endpoints = catalog(&shapes);
    let bad = Arc::new(CannedTransport {
        response: json!({ "id": 9 }),
        calls: AtomicUsize::new(0),
    });
    let client = ShapeClient::live(bad.clone(), shapes, endpoints).unwrap();
    let err = client.call("get-user", None).await.unwrap_err();
    assert!(matches!(err, CallError::ContractViolation { .. }));
    assert_eq!(bad.calls.load(Ordering::SeqCst), 1);
}
