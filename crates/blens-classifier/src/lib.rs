//! Client for the remote breed-classification endpoint.
//!
//! This crate owns the outbound half of the prediction pipeline:
//! - bearer-token acquisition with caching ([`auth`])
//! - the single synchronous prediction call ([`client`])
//! - parsing the endpoint's variably-shaped responses ([`response`])
//! - reconciling them into a ranked result ([`reconcile`])

pub mod auth;
pub mod client;
pub mod error;
pub mod reconcile;
pub mod response;

pub use auth::{StaticTokenSource, TokenCache, TokenSource, CLASSIFIER_SCOPE};
pub use client::{ClassifierClient, ClassifierConfig};
pub use error::{ClassifierError, ConfigurationError, ReconciliationError};
pub use reconcile::reconcile;
pub use response::{PredictionShape, RawPredictionResponse};
