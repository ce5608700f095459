//! Translation bounds that keep the crop frame inside the scaled image.
//!
//! For a scaled image of `W x H` points and a frame of side `C`, the image
//! center may move at most `(W - C) / 2` horizontally and `(H - C) / 2`
//! vertically from the frame center. When the scaled image is smaller than the
//! frame on an axis, that axis is pinned to zero.

use crate::geometry::{CropFrame, ImageSize, Translation};

/// Legal translation range for a given scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl TranslationBounds {
    pub fn for_scale(scale: f64, image: ImageSize, frame: CropFrame) -> Self {
        let scaled_w = image.width as f64 * scale;
        let scaled_h = image.height as f64 * scale;

        let x_max = ((scaled_w - frame.side()) / 2.0).max(0.0);
        let y_max = ((scaled_h - frame.side()) / 2.0).max(0.0);

        Self {
            x_min: -x_max,
            x_max,
            y_min: -y_max,
            y_max,
        }
    }

    pub fn clamp(&self, translation: Translation) -> Translation {
        Translation {
            x: translation.x.clamp(self.x_min, self.x_max),
            y: translation.y.clamp(self.y_min, self.y_max),
        }
    }

    pub fn contains(&self, translation: Translation) -> bool {
        translation.x >= self.x_min
            && translation.x <= self.x_max
            && translation.y >= self.y_min
            && translation.y <= self.y_max
    }
}

/// Clamp `translation` so the frame stays inside the image scaled by `scale`.
///
/// Pure and idempotent. Run on every gesture commit, never during live
/// pan/pinch updates.
pub fn clamp_translation(
    translation: Translation,
    scale: f64,
    image: ImageSize,
    frame: CropFrame,
) -> Translation {
    TranslationBounds::for_scale(scale, image, frame).clamp(translation)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
