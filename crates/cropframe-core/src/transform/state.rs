//! Viewport transform state and the scale limits that bound it.

use serde::{Deserialize, Serialize};

use crate::geometry::{CropFrame, ImageSize, Translation};

/// Affine transform applied to the loaded image for on-screen display.
///
/// The image is scaled about its center, then its center is offset from the
/// crop frame center by `translation`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub scale: f64,
    pub translation: Translation,
}

impl TransformState {
    /// Centered transform at the given scale.
    pub fn centered(scale: f64) -> Self {
        Self {
            scale,
            translation: Translation::ZERO,
        }
    }

    /// Displayed size of the image at this scale, in screen points.
    pub fn scaled_size(&self, image: ImageSize) -> (f64, f64) {
        (
            image.width as f64 * self.scale,
            image.height as f64 * self.scale,
        )
    }

    /// True when the scaled image covers the frame on both axes.
    pub fn covers(&self, image: ImageSize, frame: CropFrame) -> bool {
        let (w, h) = self.scaled_size(image);
        // Tolerate float error from side / edge * edge
        let side = frame.side() - 1e-9;
        w >= side && h >= side
    }
}

/// Legal scale range for one image inside one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleLimits {
    pub min: f64,
    pub max: f64,
    coverage: f64,
}

impl ScaleLimits {
    /// Compute limits for `image` in `frame`.
    ///
    /// `min` is the coverage scale (frame side over the shorter image edge),
    /// floored at `floor`. `max` is `ceiling`, raised to `min` for images so
    /// small that even the ceiling cannot cover the frame.
    ///
    /// `image` must not be empty.
    pub fn for_image(image: ImageSize, frame: CropFrame, floor: f64, ceiling: f64) -> Self {
        let coverage = frame.side() / image.shorter_edge().max(1) as f64;
        let min = coverage.max(floor);
        Self {
            min,
            max: ceiling.max(min),
            coverage,
        }
    }

    /// Smallest scale at which the image still covers the frame.
    pub fn coverage_scale(&self) -> f64 {
        self.coverage
    }

    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }

    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min && scale <= self.max
    }
}
