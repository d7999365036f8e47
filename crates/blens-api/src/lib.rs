//! Axum HTTP API server.
//!
//! Thin service layer over the prediction pipeline:
//! - one prediction route plus liveness endpoints
//! - error-to-status mapping for the typed pipeline errors
//! - rate limiting, CORS, request ids and logging
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
