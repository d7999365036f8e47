//! Prediction handler.
//!
//! Runs the full pipeline for one request: resolve the image source,
//! acquire and normalize the bytes, call the classifier, reconcile the
//! response into the ranked wire shape.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use blens_classifier::reconcile;
use blens_imaging::AcquisitionError;
use blens_models::{BreedScore, ImageSource, ImageTransport, PredictPayload, PredictRequest};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Successful prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub status: &'static str,
    pub label: String,
    pub confidence: f64,
    pub top5: Vec<BreedScore>,
}

/// Run a breed prediction for the submitted photo.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let source = request.source().ok_or(AcquisitionError::MissingSource)?;

    // uri-reference deployments hand the URL straight to the classifier;
    // every other case goes through acquisition and normalization.
    let payload = match (&source, state.classifier.config().transport) {
        (ImageSource::Url(url), ImageTransport::ImageUri) => PredictPayload::uri(url.clone()),
        _ => {
            let raw_image = state.fetcher.acquire(&source).await?;
            let normalized = state.normalizer.normalize(&raw_image)?;
            PredictPayload::inline(normalized.to_base64())
        }
    };

    let started = Instant::now();
    let result = state.classifier.predict(&payload).await;
    metrics::record_classifier_call(result.is_ok(), started.elapsed().as_secs_f64());
    let raw = result?;

    let ranked = reconcile(&raw, &state.catalog, state.classifier.config().top_k)?;
    metrics::record_prediction(&ranked.label);

    info!(
        label = %ranked.label,
        confidence = ranked.confidence,
        candidates = ranked.top_k.len(),
        "Prediction complete"
    );

    Ok(Json(PredictResponse {
        status: "success",
        label: ranked.label,
        confidence: ranked.confidence,
        top5: ranked.top_k,
    }))
}

/// Fallback for disallowed verbs on the predict route.
pub async fn predict_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
