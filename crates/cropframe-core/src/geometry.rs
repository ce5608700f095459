//! Geometric primitives shared by the transform engine and the crop resolver.
//!
//! # Coordinate Systems
//!
//! - **Screen space**: the crop frame, translations and gesture deltas, in
//!   display points. The frame center is the origin for translations.
//! - **Source pixel space**: the original, unscaled image grid. Origin is the
//!   top-left corner.

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (image not measured yet).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn shorter_edge(&self) -> u32 {
        self.width.min(self.height)
    }

    pub fn longer_edge(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Offset of the image center from the crop frame center, in screen points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

impl Translation {
    pub const ZERO: Translation = Translation { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return this translation moved by a gesture delta.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The fixed square viewport the user crops through.
///
/// Invariant for the lifetime of one crop session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropFrame {
    side: f64,
}

impl CropFrame {
    /// Create a frame with the given side length in screen points.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidConfig` if `side` is not a positive finite number.
    pub fn new(side: f64) -> Result<Self, CropError> {
        if !side.is_finite() || side <= 0.0 {
            return Err(CropError::InvalidConfig(format!(
                "crop frame side must be positive, got {side}"
            )));
        }
        Ok(Self { side })
    }

    /// Size the frame from the screen width: `min(screen_width - margin, max_side)`.
    pub fn for_screen(screen_width: f64, margin: f64, max_side: f64) -> Result<Self, CropError> {
        Self::new((screen_width - margin).min(max_side))
    }

    pub fn side(&self) -> f64 {
        self.side
    }
}

/// An axis-aligned rectangle in (fractional) pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square rectangle anchored at `(x, y)`.
    pub fn square(x: f64, y: f64, side: f64) -> Self {
        Self::new(x, y, side, side)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_square(&self, tolerance: f64) -> bool {
        (self.width - self.height).abs() <= tolerance
    }

    /// Snap to whole pixels inside `bounds`.
    ///
    /// Sizes are rounded and clamped to `1..=bounds`; origins are rounded and
    /// then pulled back so the rectangle never crosses the right/bottom edge.
    pub fn to_pixels(&self, bounds: ImageSize) -> PixelRect {
        let width = snap_extent(self.width, bounds.width);
        let height = snap_extent(self.height, bounds.height);
        PixelRect {
            x: snap_origin(self.x, bounds.width.saturating_sub(width)),
            y: snap_origin(self.y, bounds.height.saturating_sub(height)),
            width,
            height,
        }
    }
}

fn snap_extent(value: f64, limit: u32) -> u32 {
    let limit = limit.max(1);
    (value.round().max(1.0) as u32).min(limit)
}

fn snap_origin(value: f64, max: u32) -> u32 {
    (value.round().max(0.0) as u32).min(max)
}

/// A whole-pixel rectangle, ready for a raster crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
