//! Resizing for the scaled-raster crop path.

use super::{DecodedImage, FilterType, RasterError};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `RasterError::InvalidDimensions` for a zero target dimension and
/// `RasterError::CorruptedFile` if the pixel buffer does not match the image size.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, RasterError> {
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| RasterError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}
