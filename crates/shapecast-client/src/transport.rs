//! The transport seam.
//!
//! [`Transport`] abstracts over how an endpoint call reaches a server.
//! Implementations must be `Send + Sync` so they can be shared across async
//! tasks behind an `Arc`; the trait is object-safe to support runtime
//! selection. [`HttpTransport`] is the production implementation; tests
//! substitute their own.
//!
//! Timeouts and cancellation live inside the implementation and surface as
//! [`TransportError`] values. Retries are deliberately absent — a single
//! failed call surfaces immediately to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::endpoint::{Endpoint, Method};
use crate::error::TransportError;

/// A collaborator that performs an endpoint's network call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the call with an optional JSON payload, returning the raw
    /// response value.
    async fn send(
        &self,
        endpoint: &Endpoint,
        payload: Option<&Value>,
    ) -> Result<Value, TransportError>;

    /// Human-readable implementation name (e.g. "HttpTransport"), used in
    /// dispatch logging.
    fn name(&self) -> &str;
}

/// HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Build the transport from client configuration: per-request timeout
    /// plus an optional default bearer token header.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        if let Some(token) = &config.api_token {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| ConfigError::InvalidToken)?,
            );
            builder = builder.default_headers(headers);
        }

        let http = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn url_for(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        endpoint: &Endpoint,
        payload: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = self.url_for(endpoint);
        let request = match endpoint.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        let request = match payload {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await.map_err(|e| TransportError::Connect {
            endpoint: endpoint.id.clone(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: endpoint.id.clone(),
                status,
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::Payload {
                endpoint: endpoint.id.clone(),
                reason: e.to_string(),
            })
    }

    fn name(&self) -> &str {
        "HttpTransport"
    }
}
