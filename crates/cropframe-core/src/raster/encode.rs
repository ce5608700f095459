//! Encoding the cropped avatar to PNG or JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{DecodedImage, OutputFormat, OutputSettings, RasterError};

/// Encode an RGB image with the given output settings.
///
/// PNG output is lossless and ignores `quality`; JPEG maps `quality`
/// (`0.0..=1.0`) to encoder quality `1..=100`.
///
/// # Errors
///
/// - `RasterError::InvalidDimensions` for a zero width or height
/// - `RasterError::InvalidPixelData` if the buffer length is wrong
/// - `RasterError::EncodingFailed` if the encoder fails
pub fn encode(image: &DecodedImage, settings: OutputSettings) -> Result<Vec<u8>, RasterError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidDimensions { width, height });
    }

    let expected = width as usize * height as usize * 3;
    if image.pixels.len() != expected {
        return Err(RasterError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let result = match settings.format {
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            &image.pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, settings.jpeg_quality())
            .write_image(&image.pixels, width, height, ExtendedColorType::Rgb8),
    };
    result.map_err(|e| RasterError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
