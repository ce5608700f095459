//! Resize-then-crop against a pre-scaled raster.

use log::debug;

use super::{clamp_origin, validate_geometry, CropPlan, CropStrategy};
use crate::error::CropError;
use crate::geometry::{CropFrame, CropRect, ImageSize};
use crate::transform::TransformState;

/// Resizes the source to the displayed scale and crops a frame-sized square.
///
/// ```text
/// raster = (width * scale, height * scale)
/// origin = raster / 2 - side / 2 - translate   (clamped to 0..=raster - side)
/// ```
///
/// Used when the backend can only crop an already materialized raster. The
/// crop is what the user saw on screen, at screen resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaledRasterCrop;

impl CropStrategy for ScaledRasterCrop {
    fn name(&self) -> &'static str {
        "scaled_raster"
    }

    fn resolve(
        &self,
        image: ImageSize,
        state: &TransformState,
        frame: CropFrame,
    ) -> Result<CropPlan, CropError> {
        validate_geometry(image, state)?;

        let (scaled_w, scaled_h) = state.scaled_size(image);
        let raster = ImageSize::new(
            scaled_w.round().max(1.0) as u32,
            scaled_h.round().max(1.0) as u32,
        );
        let side = frame.side().min(raster.shorter_edge() as f64);

        let x = scaled_w / 2.0 - side / 2.0 - state.translation.x;
        let y = scaled_h / 2.0 - side / 2.0 - state.translation.y;

        let rect = CropRect::square(
            clamp_origin(x, raster.width, side),
            clamp_origin(y, raster.height, side),
            side,
        );
        debug!(
            "{}: resize to {}x{}, crop {:?}",
            self.name(),
            raster.width,
            raster.height,
            rect
        );

        Ok(CropPlan {
            source: image,
            scale: state.scale,
            resize_to: Some(raster),
            rect,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Translation;

    fn resolve(image: ImageSize, scale: f64, x: f64, y: f64) -> CropPlan {
        let state = TransformState {
            scale,
            translation: Translation::new(x, y),
        };
        ScaledRasterCrop
            .resolve(image, &state, CropFrame::new(300.0).unwrap())
            .unwrap()
    }

    #[test]
    fn test_resize_target_is_scaled_image() {
        let plan = resolve(ImageSize::new(1600, 1200), 0.25, 0.0, 0.0);
        assert_eq!(plan.resize_to, Some(ImageSize::new(400, 300)));
        assert_eq!(plan.rect, CropRect::square(50.0, 0.0, 300.0));
    }

    #[test]
    fn test_crop_is_frame_sized() {
        let plan = resolve(ImageSize::new(600, 600), 2.0, 0.0, 0.0);
        assert_eq!(plan.resize_to, Some(ImageSize::new(1200, 1200)));
        assert_eq!(plan.rect, CropRect::square(450.0, 450.0, 300.0));
    }

    #[test]
    fn test_pan_moves_crop_opposite_to_image() {
        let plan = resolve(ImageSize::new(600, 600), 2.0, 100.0, -50.0);
        assert_eq!(plan.rect.x, 350.0);
        assert_eq!(plan.rect.y, 500.0);
    }

    #[test]
    fn test_origin_clamped_to_raster() {
        let plan = resolve(ImageSize::new(600, 600), 2.0, -10_000.0, 10_000.0);
        assert_eq!(plan.rect.x, 900.0);
        assert_eq!(plan.rect.y, 0.0);
    }

    #[test]
    fn test_source_rect_maps_back() {
        let plan = resolve(ImageSize::new(600, 600), 2.0, 100.0, -50.0);
        let source = plan.source_rect();
        assert_eq!(source, CropRect::square(175.0, 250.0, 150.0));
    }
}
