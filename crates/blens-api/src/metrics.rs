//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "blens_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "blens_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "blens_http_requests_in_flight";

    pub const PREDICTIONS_TOTAL: &str = "blens_predictions_total";
    pub const CLASSIFIER_CALLS_TOTAL: &str = "blens_classifier_calls_total";
    pub const CLASSIFIER_DURATION_SECONDS: &str = "blens_classifier_duration_seconds";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "blens_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed prediction with its winning label.
pub fn record_prediction(label: &str) {
    let labels = [("label", label.to_string())];
    counter!(names::PREDICTIONS_TOTAL, &labels).increment(1);
}

/// Record one classifier call and its duration.
pub fn record_classifier_call(success: bool, duration_secs: f64) {
    let labels = [("outcome", if success { "ok" } else { "error" }.to_string())];
    counter!(names::CLASSIFIER_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::CLASSIFIER_DURATION_SECONDS).record(duration_secs);
}

/// Record a rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
