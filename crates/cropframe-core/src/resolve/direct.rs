//! Direct visible-rectangle crop at native resolution.

use log::debug;

use super::{clamp_origin, validate_geometry, CropPlan, CropStrategy};
use crate::error::CropError;
use crate::geometry::{CropFrame, CropRect, ImageSize};
use crate::transform::TransformState;

/// Crops the visible square straight out of the source image.
///
/// ```text
/// visible = side / scale
/// offset  = -translate / scale
/// origin  = image_center - visible / 2 + offset   (clamped to 0..=size - visible)
/// ```
///
/// Used when the backend can crop at native resolution, which skips the
/// intermediate resize and keeps full source quality.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRectCrop;

impl CropStrategy for DirectRectCrop {
    fn name(&self) -> &'static str {
        "direct_rect"
    }

    fn resolve(
        &self,
        image: ImageSize,
        state: &TransformState,
        frame: CropFrame,
    ) -> Result<CropPlan, CropError> {
        validate_geometry(image, state)?;

        let visible = (frame.side() / state.scale).min(image.shorter_edge() as f64);
        let offset_x = -state.translation.x / state.scale;
        let offset_y = -state.translation.y / state.scale;

        let x = image.width as f64 / 2.0 - visible / 2.0 + offset_x;
        let y = image.height as f64 / 2.0 - visible / 2.0 + offset_y;

        let rect = CropRect::square(
            clamp_origin(x, image.width, visible),
            clamp_origin(y, image.height, visible),
            visible,
        );
        debug!("{}: {:?}", self.name(), rect);

        Ok(CropPlan {
            source: image,
            scale: state.scale,
            resize_to: None,
            rect,
        })
    }
}
