//! Classifier image-transport shape selection.
//!
//! A deployment commits to exactly one instance shape; the alternatives are
//! enum variants chosen by configuration, never ad-hoc field fallbacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical MIME type of the normalized image.
pub const MIME_JPEG: &str = "image/jpeg";

/// How the image is embedded in a classifier instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageTransport {
    /// `{ "content": "<base64>" }`
    #[default]
    Content,
    /// `{ "bytesBase64Encoded": "<base64>", "mimeType": "image/jpeg" }`
    Bytes,
    /// `{ "imageUri": "<url>" }`
    ImageUri,
}

impl ImageTransport {
    /// Whether this shape carries inline base64 bytes (vs. a URI reference).
    pub fn carries_inline(&self) -> bool {
        !matches!(self, Self::ImageUri)
    }
}

impl fmt::Display for ImageTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Content => "content",
            Self::Bytes => "bytes",
            Self::ImageUri => "image-uri",
        };
        f.write_str(name)
    }
}

/// Error parsing a transport shape name.
#[derive(Debug, Error)]
#[error("unknown image transport `{0}`; expected content, bytes or image-uri")]
pub struct TransportParseError(String);

impl FromStr for ImageTransport {
    type Err = TransportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "bytes" => Ok(Self::Bytes),
            "image-uri" | "image_uri" => Ok(Self::ImageUri),
            other => Err(TransportParseError(other.to_string())),
        }
    }
}

/// What the pipeline hands to the classifier client: either the normalized
/// image as a base64 string, or the source URL for uri-reference deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictPayload {
    /// Base64 of the normalized JPEG
    Inline { b64: String },
    /// Remote image URL, passed through without acquisition
    Uri { uri: String },
}

impl PredictPayload {
    pub fn inline(b64: impl Into<String>) -> Self {
        Self::Inline { b64: b64.into() }
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri { uri: uri.into() }
    }

    /// Short human name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inline { .. } => "an inline image payload",
            Self::Uri { .. } => "a URL reference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transport_names() {
        assert_eq!("content".parse::<ImageTransport>().unwrap(), ImageTransport::Content);
        assert_eq!("bytes".parse::<ImageTransport>().unwrap(), ImageTransport::Bytes);
        assert_eq!("image-uri".parse::<ImageTransport>().unwrap(), ImageTransport::ImageUri);
        assert_eq!("IMAGE_URI".parse::<ImageTransport>().unwrap(), ImageTransport::ImageUri);
        assert!("b64".parse::<ImageTransport>().is_err());
    }

    #[test]
    fn test_default_is_content() {
        assert_eq!(ImageTransport::default(), ImageTransport::Content);
    }

    #[test]
    fn test_carries_inline() {
        assert!(ImageTransport::Content.carries_inline());
        assert!(ImageTransport::Bytes.carries_inline());
        assert!(!ImageTransport::ImageUri.carries_inline());
    }
}
