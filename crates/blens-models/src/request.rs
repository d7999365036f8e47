//! Inbound prediction request.

use serde::{Deserialize, Serialize};

/// Body of a prediction request.
///
/// Carries the photo either as a remote URL or as an inline base64 payload.
/// At least one must be present; when both are present the inline payload
/// wins, since an upload is explicit user intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Remote URL of the photo
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Inline photo bytes, base64-encoded (optionally a data URL)
    #[serde(rename = "fileB64", skip_serializing_if = "Option::is_none")]
    pub file_b64: Option<String>,
}

impl PredictRequest {
    /// Create a request from a remote URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            image_url: Some(url.into()),
            file_b64: None,
        }
    }

    /// Create a request from an inline base64 payload.
    pub fn from_inline(b64: impl Into<String>) -> Self {
        Self {
            image_url: None,
            file_b64: Some(b64.into()),
        }
    }

    /// Resolve the image source, applying inline-over-URL precedence.
    ///
    /// Returns `None` when neither field is present.
    pub fn source(&self) -> Option<ImageSource> {
        if let Some(b64) = self.file_b64.as_deref() {
            return Some(ImageSource::Inline(b64.to_string()));
        }
        self.image_url
            .as_deref()
            .map(|url| ImageSource::Url(url.to_string()))
    }
}

/// A resolved image source: exactly one way to obtain the photo bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Fetch the photo from a remote URL
    Url(String),
    /// Decode the photo from an inline base64 payload
    Inline(String),
}
