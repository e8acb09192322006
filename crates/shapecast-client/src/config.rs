//! Client configuration.
//!
//! One config struct selects the transport target, credentials, and the
//! live/simulate toggle for an entire client — simulation is a
//! construction-time decision, not a per-call flag. Defaults suit local
//! development; override via environment variables or explicit construction.

use url::Url;

/// Configuration for constructing a [`crate::ShapeClient`].
///
/// Custom `Debug` implementation redacts the `api_token` field to prevent
/// credential leakage in log output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: Url,
    /// Optional bearer token attached to every live request.
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// When true the client fabricates conforming responses and never
    /// touches the network.
    pub simulate: bool,
    /// Optional seed making simulated responses reproducible.
    pub fabricate_seed: Option<u64>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("simulate", &self.simulate)
            .field("fabricate_seed", &self.fabricate_seed)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SHAPECAST_BASE_URL` (default: `http://127.0.0.1:8080`)
    /// - `SHAPECAST_API_TOKEN` (optional)
    /// - `SHAPECAST_TIMEOUT_SECS` (default: 30)
    /// - `SHAPECAST_SIMULATE` (truthy values: `1`, `true`, `yes`)
    /// - `SHAPECAST_FABRICATE_SEED` (optional u64)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("SHAPECAST_BASE_URL", "http://127.0.0.1:8080")?;
        let fabricate_seed = match std::env::var("SHAPECAST_FABRICATE_SEED") {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|_| ConfigError::InvalidSeed(raw.clone()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            api_token: std::env::var("SHAPECAST_API_TOKEN").ok(),
            timeout_secs: std::env::var("SHAPECAST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            simulate: std::env::var("SHAPECAST_SIMULATE")
                .map(|raw| is_truthy(&raw))
                .unwrap_or(false),
            fabricate_seed,
        })
    }

    /// A configuration pointing at a local server (for testing).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the localhost URL cannot be
    /// parsed (should not occur for valid port numbers, but avoids
    /// `expect()`).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            api_token: None,
            timeout_secs: 5,
            simulate: false,
            fabricate_seed: None,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A URL value failed to parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    /// The fabrication seed was not a u64.
    #[error("invalid fabrication seed: {0}")]
    InvalidSeed(String),

    /// The bearer token contains characters unusable in an HTTP header.
    #[error("invalid bearer token characters")]
    InvalidToken,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
