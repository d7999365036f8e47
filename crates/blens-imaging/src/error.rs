//! Error types for image acquisition and normalization.

use thiserror::Error;

/// Errors obtaining raw image bytes.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("no image source provided; supply imageUrl or fileB64")]
    MissingSource,

    #[error("invalid image URL: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch image: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("image fetch returned HTTP {status}")]
    FetchStatus { status: u16 },

    #[error("inline payload is not valid base64: {0}")]
    InvalidPayload(#[from] base64::DecodeError),

    #[error("image of {actual} bytes exceeds the {limit}-byte limit")]
    TooLarge { actual: usize, limit: usize },
}

impl AcquisitionError {
    /// Whether the failure was caused by the client's input rather than
    /// the remote source being unreachable.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingSource | Self::InvalidUrl(_) | Self::InvalidPayload(_) | Self::TooLarge { .. }
        )
    }
}

/// Errors producing the normalized transport image.
#[derive(Debug, Error)]
pub enum NormalizationError {
    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode image: {0}")]
    Encode(#[source] image::ImageError),
}
