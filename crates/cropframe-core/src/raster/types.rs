//! Core types for the raster pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ImageSize;

/// Errors from decoding, resizing, cropping or encoding.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The file type is not one of the accepted avatar formats.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The bytes are not a recognizable image.
    #[error("Invalid or unrecognized image data")]
    InvalidFormat,

    /// The image header or body could not be read.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match expected dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// The crop plan is inconsistent or was resolved for a different image.
    #[error("Crop plan does not match the image: {0}")]
    PlanMismatch(String),

    /// Encoding the output failed.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Accepted source formats for avatar images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Jpeg,
    Png,
}

impl SourceFormat {
    /// Determine the format from a URI's file extension.
    ///
    /// Matching is case-insensitive; query strings and fragments are ignored.
    pub fn from_uri(uri: &str) -> Result<Self, RasterError> {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.contains('/'))
            .unwrap_or("");

        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(SourceFormat::Jpeg),
            "png" => Ok(SourceFormat::Png),
            "" => Err(RasterError::UnsupportedFormat(format!("no file extension in {uri}"))),
            other => Err(RasterError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Determine the format from the file's magic bytes.
    pub fn sniff(bytes: &[u8]) -> Result<Self, RasterError> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
            Ok(image::ImageFormat::Png) => Ok(SourceFormat::Png),
            Ok(other) => Err(RasterError::UnsupportedFormat(
                format!("{other:?}").to_ascii_lowercase(),
            )),
            Err(_) => Err(RasterError::InvalidFormat),
        }
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            SourceFormat::Jpeg => image::ImageFormat::Jpeg,
            SourceFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Encoded output format for the cropped avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

/// Output format plus compression quality (`0.0..=1.0`, JPEG only).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub quality: f32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: 1.0,
        }
    }
}

impl OutputSettings {
    /// JPEG encoder quality in `1..=100`.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width * height * 3) as usize,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.width, self.height)
    }
}
