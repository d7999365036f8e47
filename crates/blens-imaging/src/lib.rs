//! Image acquisition and normalization.
//!
//! The first two stages of the prediction pipeline: obtain the raw photo
//! bytes (remote URL or inline base64 payload) and normalize them into the
//! single transport form the classifier contract expects (bounded width,
//! JPEG, base64).

pub mod acquire;
pub mod error;
pub mod normalize;

pub use acquire::{FetchConfig, ImageFetcher, SourceImage};
pub use error::{AcquisitionError, NormalizationError};
pub use normalize::{NormalizedImage, Normalizer, NormalizerConfig};
