//! Image normalization.
//!
//! Every source image is reduced to one canonical transport form: width
//! capped at the configured maximum (never upsampled), JPEG at the
//! configured quality, base64-encoded for the classifier request. Input
//! already in canonical form is passed through byte-identical, which makes
//! normalization idempotent.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::acquire::SourceImage;
use crate::error::NormalizationError;

/// Configuration for image normalization.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Maximum output width in pixels; height scales proportionally
    pub max_width: u32,
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_width: 512,
            jpeg_quality: 80,
        }
    }
}

impl NormalizerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_width: std::env::var("BLENS_MAX_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_width),
            jpeg_quality: std::env::var("BLENS_JPEG_QUALITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jpeg_quality),
        }
    }
}

/// The canonical transport image: JPEG, width ≤ the configured maximum.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG bytes
    pub bytes: Vec<u8>,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
}

impl NormalizedImage {
    /// Base64 of the JPEG bytes, for embedding in a classifier instance.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

/// Produces normalized images from raw source bytes.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a new normalizer.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(NormalizerConfig::from_env())
    }

    /// Normalize a source image into the canonical transport form.
    ///
    /// A source that is already a JPEG at or below the maximum width is
    /// returned byte-identical, so re-normalizing an output is a no-op.
    pub fn normalize(&self, source: &SourceImage) -> Result<NormalizedImage, NormalizationError> {
        let format = image::guess_format(&source.bytes).ok();

        let decoded =
            image::load_from_memory(&source.bytes).map_err(NormalizationError::Decode)?;
        let (width, height) = (decoded.width(), decoded.height());

        if format == Some(ImageFormat::Jpeg) && width <= self.config.max_width {
            debug!(width, height, "Source already canonical, passing through");
            return Ok(NormalizedImage {
                bytes: source.bytes.clone(),
                width,
                height,
            });
        }

        let scaled = if width > self.config.max_width {
            decoded.resize(self.config.max_width, u32::MAX, FilterType::Lanczos3)
        } else {
            decoded
        };

        let bytes = self.encode_jpeg(&scaled)?;

        debug!(
            in_width = width,
            out_width = scaled.width(),
            out_bytes = bytes.len(),
            "Normalized source image"
        );

        Ok(NormalizedImage {
            width: scaled.width(),
            height: scaled.height(),
            bytes,
        })
    }

    fn encode_jpeg(&self, img: &DynamicImage) -> Result<Vec<u8>, NormalizationError> {
        // JPEG has no alpha channel; flatten to RGB before encoding.
        let rgb = img.to_rgb8();
        let mut out = Cursor::new(Vec::new());
        let mut encoder = JpegEncoder::new_with_quality(&mut out, self.config.jpeg_quality);
        encoder
            .encode_image(&rgb)
            .map_err(NormalizationError::Encode)?;
        Ok(out.into_inner())
    }
}
