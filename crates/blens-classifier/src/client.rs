//! Classifier HTTP client.
//!
//! One synchronous prediction call per request: a POST of a single
//! instance plus parameters, authenticated with a bearer token. No retry
//! and no caching; failures surface verbatim for the caller to handle.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use blens_models::{ImageTransport, PredictPayload, MIME_JPEG};

use crate::auth::{StaticTokenSource, TokenCache, TokenSource};
use crate::error::{ClassifierError, ConfigurationError};
use crate::response::RawPredictionResponse;

/// Environment variable for a pinned bearer token (bypasses gcp_auth).
pub const STATIC_TOKEN_ENV: &str = "BLENS_STATIC_BEARER_TOKEN";

/// Configuration for the classifier client.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Full `…:predict` URL of the classification endpoint
    pub endpoint: String,
    /// The one instance shape this deployment uses
    pub transport: ImageTransport,
    /// Minimum confidence the service should report
    pub confidence_threshold: f64,
    /// Maximum predictions the service should return
    pub max_predictions: u32,
    /// Ranked entries kept after reconciliation
    pub top_k: usize,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl ClassifierConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let endpoint = std::env::var("BLENS_CLASSIFIER_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigurationError::MissingEndpoint)?;

        let transport = match std::env::var("BLENS_IMAGE_TRANSPORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => ImageTransport::default(),
        };

        Ok(Self {
            endpoint,
            transport,
            confidence_threshold: std::env::var("BLENS_CONFIDENCE_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0.2),
            max_predictions: std::env::var("BLENS_MAX_PREDICTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            top_k: std::env::var("BLENS_TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            timeout: Duration::from_secs(
                std::env::var("BLENS_CLASSIFIER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            connect_timeout: Duration::from_secs(5),
        })
    }
}

#[derive(Debug, Serialize)]
struct PredictionRequestBody {
    instances: Vec<serde_json::Value>,
    parameters: PredictionParameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictionParameters {
    confidence_threshold: f64,
    max_predictions: u32,
}

/// Client for the remote classification endpoint.
pub struct ClassifierClient {
    http: Client,
    config: ClassifierConfig,
    tokens: Arc<dyn TokenSource>,
}

impl ClassifierClient {
    /// Create a client with the deployment's credential configuration.
    ///
    /// A pinned `BLENS_STATIC_BEARER_TOKEN` takes priority; otherwise the
    /// service-account token cache is used. Missing credentials fail here,
    /// before any prediction is attempted.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let tokens: Arc<dyn TokenSource> = match std::env::var(STATIC_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                Arc::new(StaticTokenSource::new(token.trim()))
            }
            _ => Arc::new(TokenCache::from_env()?),
        };
        Self::with_token_source(config, tokens)
    }

    /// Create a client with an explicit token source.
    pub fn with_token_source(
        config: ClassifierConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, ClassifierError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("blens-classifier/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            tokens,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, ClassifierError> {
        Self::new(ClassifierConfig::from_env()?)
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Issue one prediction call for the payload.
    pub async fn predict(
        &self,
        payload: &PredictPayload,
    ) -> Result<RawPredictionResponse, ClassifierError> {
        let instance = build_instance(self.config.transport, payload)?;
        let body = PredictionRequestBody {
            instances: vec![instance],
            parameters: PredictionParameters {
                confidence_threshold: self.config.confidence_threshold,
                max_predictions: self.config.max_predictions,
            },
        };

        let token = self.tokens.bearer_token().await?;

        debug!(endpoint = %self.config.endpoint, transport = %self.config.transport, "Sending prediction request");

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Build the single instance object for the configured transport shape.
///
/// A payload the shape cannot carry is a deployment error, not a cue to
/// fall back to another shape.
fn build_instance(
    transport: ImageTransport,
    payload: &PredictPayload,
) -> Result<serde_json::Value, ConfigurationError> {
    match (transport, payload) {
        (ImageTransport::Content, PredictPayload::Inline { b64 }) => {
            Ok(json!({ "content": b64 }))
        }
        (ImageTransport::Bytes, PredictPayload::Inline { b64 }) => Ok(json!({
            "bytesBase64Encoded": b64,
            "mimeType": MIME_JPEG,
        })),
        (ImageTransport::ImageUri, PredictPayload::Uri { uri }) => {
            Ok(json!({ "imageUri": uri }))
        }
        (shape, payload) => Err(ConfigurationError::IncompatiblePayload {
            shape,
            payload: payload.kind(),
        }),
    }
}
