//! API error types and HTTP mapping.
//!
//! Every pipeline failure maps to the `{ "error": <category>,
//! "details": <human-readable> }` wire shape. Classifier failures forward
//! the remote status code and raw body verbatim; nothing is swallowed into
//! a generic success.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use blens_classifier::{ClassifierError, ConfigurationError, ReconciliationError};
use blens_imaging::{AcquisitionError, NormalizationError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Acquisition(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Acquisition(_) | ApiError::Normalization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Classifier(ClassifierError::Status { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Classifier(ClassifierError::Network(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Classifier(ClassifierError::Config(_))
            | ApiError::Configuration(_)
            | ApiError::Reconciliation(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable failure category.
    fn category(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::Internal(_) => "internal_error",
            ApiError::Acquisition(_) => "acquisition_failed",
            ApiError::Normalization(_) => "normalization_failed",
            ApiError::Configuration(_) | ApiError::Classifier(ClassifierError::Config(_)) => {
                "configuration_error"
            }
            ApiError::Classifier(_) => "classifier_error",
            ApiError::Reconciliation(_) => "reconciliation_failed",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Remote classifier bodies are forwarded verbatim as the detail.
        let details = match &self {
            ApiError::Classifier(ClassifierError::Status { body, .. }) => {
                (!body.is_empty()).then(|| body.clone())
            }
            other => Some(other.to_string()),
        };

        let body = ErrorResponse {
            error: self.category(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_is_client_error() {
        let err = ApiError::from(AcquisitionError::MissingSource);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.category(), "acquisition_failed");
    }

    #[test]
    fn test_unreachable_source_is_server_error() {
        let err = ApiError::from(AcquisitionError::FetchStatus { status: 404 });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_classifier_status_is_forwarded_verbatim() {
        let err = ApiError::from(ClassifierError::Status {
            status: 503,
            body: "quota exceeded".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.category(), "classifier_error");
    }

    #[test]
    fn test_method_not_allowed() {
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
