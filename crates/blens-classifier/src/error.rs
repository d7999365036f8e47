//! Classifier error types.

use thiserror::Error;

/// Deployment configuration problems: missing credentials, missing
/// endpoint, or a transport shape that cannot carry the given payload.
/// Always fatal for the request; never retried.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("service account credentials unavailable: {0}")]
    Credentials(String),

    #[error("classifier endpoint not configured; set BLENS_CLASSIFIER_ENDPOINT")]
    MissingEndpoint,

    #[error("invalid image transport configuration: {0}")]
    InvalidTransport(#[from] blens_models::TransportParseError),

    #[error("image transport `{shape}` cannot carry {payload}")]
    IncompatiblePayload {
        shape: blens_models::ImageTransport,
        payload: &'static str,
    },
}

/// Failures of the prediction call itself.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error(transparent)]
    Config(#[from] ConfigurationError),

    /// Non-success HTTP status, surfaced verbatim with the raw body.
    #[error("classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("classifier request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Malformed or incomplete prediction payloads. The raw payload travels
/// with the error for diagnosis; it is never partially ranked.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("response contained no predictions")]
    NoPredictions,

    #[error("unrecognized prediction shape: {raw}")]
    UnrecognizedShape { raw: serde_json::Value },

    #[error("prediction contained an empty score array")]
    EmptyScores,

    #[error("prediction has {labels} labels but {scores} scores")]
    LengthMismatch { labels: usize, scores: usize },

    #[error("prediction has {scores} scores but the label catalog only has {catalog}")]
    CatalogTooSmall { scores: usize, catalog: usize },
}
