//! Measuring and decoding source images.

use std::io::Cursor;

use image::ImageReader;

use super::{DecodedImage, RasterError, SourceFormat};
use crate::geometry::ImageSize;

/// Read the image dimensions from the header without decoding pixels.
///
/// # Errors
///
/// - `RasterError::UnsupportedFormat` for recognizable non-JPEG/PNG data
/// - `RasterError::InvalidFormat` for unrecognizable bytes
/// - `RasterError::CorruptedFile` if the header cannot be read
pub fn measure(bytes: &[u8]) -> Result<ImageSize, RasterError> {
    let format = SourceFormat::sniff(bytes)?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), format.to_image_format())
        .into_dimensions()
        .map_err(|e| RasterError::CorruptedFile(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }
    Ok(ImageSize::new(width, height))
}

/// Decode JPEG or PNG bytes into RGB pixels.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, RasterError> {
    let format = SourceFormat::sniff(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format.to_image_format())
        .map_err(|e| RasterError::CorruptedFile(e.to_string()))?;
    Ok(DecodedImage::from_rgb_image(img.to_rgb8()))
}
