//! Crop resolution: committed transform -> crop plan in pixel coordinates.
//!
//! Two strategies are provided, picked by configuration according to what the
//! image backend can do:
//!
//! - [`ScaledRasterCrop`] - resize the whole source to the displayed scale,
//!   then cut a frame-sized square out of that raster
//! - [`DirectRectCrop`] - compute the visible square directly in source pixels
//!   and crop at native resolution (no intermediate raster)
//!
//! Both select the same region of the source image for the same transform.

mod direct;
mod scaled;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::{CropFrame, CropRect, ImageSize};
use crate::transform::TransformState;

pub use direct::DirectRectCrop;
pub use scaled::ScaledRasterCrop;

/// Resolves the visible crop frame into a crop plan.
pub trait CropStrategy: fmt::Debug + Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Compute the crop plan for `state` applied to `image` inside `frame`.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidState` for zero image dimensions or a
    /// non-positive scale.
    fn resolve(
        &self,
        image: ImageSize,
        state: &TransformState,
        frame: CropFrame,
    ) -> Result<CropPlan, CropError>;
}

/// Configuration-level choice of crop strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Resize-then-crop, for backends that can only crop an existing raster.
    ScaledRaster,
    /// Crop the visible rectangle at native resolution.
    #[default]
    DirectRect,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn CropStrategy> {
        match self {
            StrategyKind::ScaledRaster => Box::new(ScaledRasterCrop),
            StrategyKind::DirectRect => Box::new(DirectRectCrop),
        }
    }
}

/// Output of a crop strategy: what the image backend must do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropPlan {
    /// Dimensions of the source image.
    pub source: ImageSize,
    /// Scale the plan was resolved at.
    pub scale: f64,
    /// Resize the source to these dimensions before cropping, if set.
    pub resize_to: Option<ImageSize>,
    /// Square crop region in the coordinates of the raster it applies to
    /// (`resize_to` when set, otherwise the source).
    pub rect: CropRect,
}

impl CropPlan {
    /// Dimensions of the raster `rect` applies to.
    pub fn raster_size(&self) -> ImageSize {
        self.resize_to.unwrap_or(self.source)
    }

    /// The crop region in source pixel coordinates.
    pub fn source_rect(&self) -> CropRect {
        match self.resize_to {
            None => self.rect,
            Some(_) => {
                let side = (self.rect.width / self.scale).min(self.source.shorter_edge() as f64);
                CropRect::square(
                    clamp_origin(self.rect.x / self.scale, self.source.width, side),
                    clamp_origin(self.rect.y / self.scale, self.source.height, side),
                    side,
                )
            }
        }
    }
}

/// Reject geometry that cannot be resolved.
pub(crate) fn validate_geometry(image: ImageSize, state: &TransformState) -> Result<(), CropError> {
    if image.is_empty() {
        return Err(CropError::InvalidState(format!(
            "image dimensions not measured ({}x{})",
            image.width, image.height
        )));
    }
    if !state.scale.is_finite() || state.scale <= 0.0 {
        return Err(CropError::InvalidState(format!(
            "scale must be positive, got {}",
            state.scale
        )));
    }
    if !state.translation.is_finite() {
        return Err(CropError::InvalidState("translation must be finite".to_string()));
    }
    Ok(())
}

/// Clamp a square's origin on one axis so it stays inside `0..=extent`.
pub(crate) fn clamp_origin(origin: f64, extent: u32, side: f64) -> f64 {
    origin.clamp(0.0, (extent as f64 - side).max(0.0))
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::transform::{clamp_translation, ScaleLimits};
    use crate::geometry::Translation;
    use proptest::prelude::*;

    /// Committed-looking state: scale within limits, translation clamped.
    fn committed_case() -> impl Strategy<Value = (ImageSize, CropFrame, TransformState)> {
        (
            (20u32..=5000, 20u32..=5000),
            100.0f64..=400.0,
            0.0f64..=1.0,
            (-10_000.0f64..=10_000.0, -10_000.0f64..=10_000.0),
        )
            .prop_map(|((w, h), side, zoom, (x, y))| {
                let image = ImageSize::new(w, h);
                let frame = CropFrame::new(side).unwrap();
                let limits = ScaleLimits::for_image(image, frame, 0.05, 2.5);
                let scale = limits.min + (limits.max - limits.min) * zoom;
                let translation = clamp_translation(Translation::new(x, y), scale, image, frame);
                (image, frame, TransformState { scale, translation })
            })
    }

    proptest! {
        /// Property: Resolved rectangles are square and inside the source.
        #[test]
        fn prop_source_rect_in_bounds((image, frame, state) in committed_case()) {
            for kind in [StrategyKind::ScaledRaster, StrategyKind::DirectRect] {
                let plan = kind.build().resolve(image, &state, frame).unwrap();
                let rect = plan.source_rect();
                let eps = 1e-6;
                prop_assert!(rect.x >= 0.0);
                prop_assert!(rect.y >= 0.0);
                prop_assert!(rect.right() <= image.width as f64 + eps);
                prop_assert!(rect.bottom() <= image.height as f64 + eps);
                prop_assert!(rect.is_square(0.0));
                prop_assert!(plan.rect.is_square(0.0));
            }
        }

        /// Property: The plan rectangle fits the raster it applies to.
        #[test]
        fn prop_plan_rect_in_raster((image, frame, state) in committed_case()) {
            for kind in [StrategyKind::ScaledRaster, StrategyKind::DirectRect] {
                let plan = kind.build().resolve(image, &state, frame).unwrap();
                let raster = plan.raster_size();
                let eps = 1e-6;
                prop_assert!(plan.rect.x >= 0.0 && plan.rect.y >= 0.0);
                prop_assert!(plan.rect.right() <= raster.width as f64 + eps);
                prop_assert!(plan.rect.bottom() <= raster.height as f64 + eps);
            }
        }

        /// Property: Both strategies select the same source region, up to the
        /// rounding of the intermediate raster.
        #[test]
        fn prop_variants_select_same_region((image, frame, state) in committed_case()) {
            let a = ScaledRasterCrop.resolve(image, &state, frame).unwrap().source_rect();
            let b = DirectRectCrop.resolve(image, &state, frame).unwrap().source_rect();
            // Half a scaled pixel of raster rounding, expressed in source pixels
            let tolerance = 1.0 / state.scale + 1e-6;
            prop_assert!((a.x - b.x).abs() <= tolerance, "{:?} vs {:?}", a, b);
            prop_assert!((a.y - b.y).abs() <= tolerance, "{:?} vs {:?}", a, b);
            prop_assert!((a.width - b.width).abs() <= tolerance, "{:?} vs {:?}", a, b);
        }
    }
}
