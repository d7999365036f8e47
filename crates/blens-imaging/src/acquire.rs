//! Source-image acquisition.
//!
//! Turns a resolved [`ImageSource`] into raw bytes. The URL path is a
//! single GET with no retry; the inline path is a base64 decode. Either
//! failure surfaces as [`AcquisitionError`] for the caller to report.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use tracing::debug;
use url::Url;

use blens_models::ImageSource;

use crate::error::AcquisitionError;

/// Raw photo bytes as obtained from the source, before normalization.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Undecoded image bytes
    pub bytes: Vec<u8>,
    /// Content type reported by the source, if any
    pub content_type: Option<String>,
}

/// Configuration for source-image fetching.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Fetch timeout
    pub timeout: Duration,
    /// Maximum accepted source size in bytes
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_bytes: 20 * 1024 * 1024, // 20MB
        }
    }
}

impl FetchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: Duration::from_secs(
                std::env::var("BLENS_FETCH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.timeout.as_secs()),
            ),
            max_bytes: std::env::var("BLENS_MAX_IMAGE_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_bytes),
        }
    }
}

/// Obtains source images from URLs or inline payloads.
pub struct ImageFetcher {
    http: Client,
    config: FetchConfig,
}

impl ImageFetcher {
    /// Create a new fetcher.
    pub fn new(config: FetchConfig) -> Result<Self, AcquisitionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("blens-imaging/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, AcquisitionError> {
        Self::new(FetchConfig::from_env())
    }

    /// Obtain the raw image for a resolved source.
    pub async fn acquire(&self, source: &ImageSource) -> Result<SourceImage, AcquisitionError> {
        match source {
            ImageSource::Url(url) => self.fetch_url(url).await,
            ImageSource::Inline(b64) => self.decode_inline(b64),
        }
    }

    async fn fetch_url(&self, raw_url: &str) -> Result<SourceImage, AcquisitionError> {
        let url = Url::parse(raw_url)
            .map_err(|e| AcquisitionError::InvalidUrl(format!("{raw_url}: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(AcquisitionError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AcquisitionError::FetchStatus {
                status: status.as_u16(),
            });
        }

        if let Some(declared) = response.content_length() {
            if declared as usize > self.config.max_bytes {
                return Err(AcquisitionError::TooLarge {
                    actual: declared as usize,
                    limit: self.config.max_bytes,
                });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await?;
        if bytes.len() > self.config.max_bytes {
            return Err(AcquisitionError::TooLarge {
                actual: bytes.len(),
                limit: self.config.max_bytes,
            });
        }

        debug!(url = %raw_url, size = bytes.len(), "Fetched source image");

        Ok(SourceImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    fn decode_inline(&self, payload: &str) -> Result<SourceImage, AcquisitionError> {
        let (content_type, data) = split_data_url(payload.trim());

        let bytes = BASE64.decode(data)?;
        if bytes.len() > self.config.max_bytes {
            return Err(AcquisitionError::TooLarge {
                actual: bytes.len(),
                limit: self.config.max_bytes,
            });
        }

        debug!(size = bytes.len(), "Decoded inline image payload");

        Ok(SourceImage {
            bytes,
            content_type,
        })
    }
}

/// Split an optional `data:<mime>;base64,` prefix off an inline payload.
fn split_data_url(payload: &str) -> (Option<String>, &str) {
    let Some(rest) = payload.strip_prefix("data:") else {
        return (None, payload);
    };
    match rest.split_once(";base64,") {
        Some((mime, data)) => {
            let mime = mime.trim();
            let content_type = (!mime.is_empty()).then(|| mime.to_string());
            (content_type, data)
        }
        None => (None, payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_split_data_url() {
        let (mime, data) = split_data_url("data:image/png;base64,aGVsbG8=");
        assert_eq!(mime.as_deref(), Some("image/png"));
        assert_eq!(data, "aGVsbG8=");

        let (mime, data) = split_data_url("aGVsbG8=");
        assert_eq!(mime, None);
        assert_eq!(data, "aGVsbG8=");
    }

    #[test]
    fn test_decode_inline_roundtrip() {
        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let img = fetcher.decode_inline("aGVsbG8=").unwrap();
        assert_eq!(img.bytes, b"hello");
    }

    #[test]
    fn test_decode_inline_rejects_garbage() {
        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        assert!(matches!(
            fetcher.decode_inline("not$$base64"),
            Err(AcquisitionError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_decode_inline_enforces_size_limit() {
        let fetcher = ImageFetcher::new(FetchConfig {
            max_bytes: 4,
            ..FetchConfig::default()
        })
        .unwrap();
        assert!(matches!(
            fetcher.decode_inline("aGVsbG8="),
            Err(AcquisitionError::TooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_url_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dog.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"fake-image".to_vec())
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(&server)
            .await;

        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let source = ImageSource::Url(format!("{}/dog.jpg", server.uri()));
        let img = fetcher.acquire(&source).await.unwrap();

        assert_eq!(img.bytes, b"fake-image");
        assert_eq!(img.content_type.as_deref(), Some("image/jpeg"));
    }

    #[tokio::test]
    async fn test_fetch_url_non_success_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.jpg"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let source = ImageSource::Url(format!("{}/missing.jpg", server.uri()));

        assert!(matches!(
            fetcher.acquire(&source).await,
            Err(AcquisitionError::FetchStatus { status: 404 })
        ));
    }

    #[tokio::test]
    async fn test_fetch_url_rejects_bad_scheme() {
        let fetcher = ImageFetcher::new(FetchConfig::default()).unwrap();
        let source = ImageSource::Url("ftp://example.com/dog.jpg".to_string());

        assert!(matches!(
            fetcher.acquire(&source).await,
            Err(AcquisitionError::InvalidUrl(_))
        ));
    }
}
