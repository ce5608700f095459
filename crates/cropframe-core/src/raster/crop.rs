//! Whole-pixel crop of a decoded raster.

use super::{DecodedImage, RasterError};
use crate::geometry::PixelRect;

/// Copy the pixels inside `rect` into a new image.
///
/// # Errors
///
/// Returns `RasterError::InvalidDimensions` if `rect` is empty or extends past
/// the image edges. Use [`CropRect::to_pixels`](crate::geometry::CropRect::to_pixels)
/// to snap a fractional rectangle inside the image first.
pub fn crop_pixels(image: &DecodedImage, rect: PixelRect) -> Result<DecodedImage, RasterError> {
    let fits = rect.x.checked_add(rect.width).is_some_and(|r| r <= image.width)
        && rect.y.checked_add(rect.height).is_some_and(|b| b <= image.height);
    if rect.width == 0 || rect.height == 0 || !fits {
        return Err(RasterError::InvalidDimensions {
            width: rect.width,
            height: rect.height,
        });
    }

    // Fast path: full crop returns a clone
    if rect.width == image.width && rect.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = rect.width as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.y..rect.y + rect.height {
        let start = y as usize * src_stride + rect.x as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(rect.width, rect.height, output))
}
