use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

use super::traits::ResourceCodec;
use crate::constants::DEFAULT_JPEG_QUALITY;
use crate::utils::{RecipeError, Result};

/// Pixel codec for recipe photos.
///
/// Decodes any format the `image` crate was built with and persists as JPEG.
#[derive(Debug, Clone, Copy)]
pub struct ImageCodec {
    quality: u8,
}

impl ImageCodec {
    /// Create a codec that re-encodes at the given JPEG quality (1-100)
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ResourceCodec for ImageCodec {
    type Resource = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(RecipeError::Decode("empty image payload".to_string()));
        }
        image::load_from_memory(bytes).map_err(|e| RecipeError::Decode(e.to_string()))
    }

    fn encode(&self, resource: &DynamicImage) -> Result<Vec<u8>> {
        if resource.width() == 0 || resource.height() == 0 {
            return Err(RecipeError::Encode("image has no pixels".to_string()));
        }

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(resource.to_rgb8());

        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buf, self.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| RecipeError::Encode(e.to_string()))?;
        Ok(buf)
    }
}
