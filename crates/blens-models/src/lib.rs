//! Shared data models for the BreedLens backend.
//!
//! This crate provides Serde-serializable types for:
//! - The inbound prediction request and its source-image resolution rules
//! - Ranked prediction output (best match + top-K)
//! - The classifier image-transport shape selection
//! - The breed label catalog

pub mod catalog;
pub mod prediction;
pub mod request;
pub mod transport;

// Re-export common types
pub use catalog::{BreedCatalog, CatalogError};
pub use prediction::{BreedScore, RankedPrediction};
pub use request::{ImageSource, PredictRequest};
pub use transport::{ImageTransport, PredictPayload, TransportParseError, MIME_JPEG};
