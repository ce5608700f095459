//! Crop engine configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a valid
//! configuration:
//!
//! ```json
//! { "max_scale": 3.0, "strategy": "scaled_raster", "output": { "format": "jpeg", "quality": 0.9 } }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::CropFrame;
use crate::raster::{FilterType, OutputSettings};
use crate::resolve::StrategyKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Largest crop frame side, in screen points.
    pub frame_side: f64,
    /// Horizontal space kept around the frame on narrow screens.
    pub screen_margin: f64,
    /// Zoom ceiling (raised automatically for images too small to cover the frame).
    pub max_scale: f64,
    /// Absolute lower bound on the scale.
    pub min_scale_floor: f64,
    /// Cap on the initial fit scale (never applied below coverage).
    pub initial_scale_cap: f64,
    /// Multiplier per zoom-button press.
    pub zoom_step: f64,
    /// Double-tap zoomed scale, as a multiple of the fit scale.
    pub double_tap_multiplier: f64,
    /// Duration of zoom-button and double-tap animations.
    pub zoom_animation_ms: u64,
    pub strategy: StrategyKind,
    /// Filter for the scaled-raster resize.
    pub resize_filter: FilterType,
    pub output: OutputSettings,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            frame_side: 300.0,
            screen_margin: 60.0,
            max_scale: 2.5,
            min_scale_floor: 0.05,
            initial_scale_cap: 1.2,
            zoom_step: 1.2,
            double_tap_multiplier: 2.0,
            zoom_animation_ms: 200,
            strategy: StrategyKind::default(),
            resize_filter: FilterType::default(),
            output: OutputSettings::default(),
        }
    }
}

impl CropConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, CropError> {
        let config: CropConfig =
            serde_json::from_str(json).map_err(|e| CropError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every numeric field against its legal range.
    pub fn validate(&self) -> Result<(), CropError> {
        positive("frame_side", self.frame_side)?;
        positive("max_scale", self.max_scale)?;
        positive("min_scale_floor", self.min_scale_floor)?;
        positive("initial_scale_cap", self.initial_scale_cap)?;

        if !self.screen_margin.is_finite() || self.screen_margin < 0.0 {
            return Err(invalid("screen_margin", self.screen_margin, "must be >= 0"));
        }
        if self.min_scale_floor > self.max_scale {
            return Err(invalid(
                "min_scale_floor",
                self.min_scale_floor,
                "must not exceed max_scale",
            ));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(invalid("zoom_step", self.zoom_step, "must be > 1"));
        }
        if !(self.double_tap_multiplier.is_finite() && self.double_tap_multiplier > 1.0) {
            return Err(invalid(
                "double_tap_multiplier",
                self.double_tap_multiplier,
                "must be > 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.output.quality) {
            return Err(invalid(
                "output.quality",
                self.output.quality as f64,
                "must be within 0..=1",
            ));
        }
        Ok(())
    }

    pub fn zoom_animation(&self) -> Duration {
        Duration::from_millis(self.zoom_animation_ms)
    }

    /// Crop frame for a screen of the given width.
    pub fn frame_for_screen(&self, screen_width: f64) -> Result<CropFrame, CropError> {
        CropFrame::for_screen(screen_width, self.screen_margin, self.frame_side)
    }
}

fn positive(field: &str, value: f64) -> Result<(), CropError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> CropError {
    CropError::InvalidConfig(format!("{field} = {value} {reason}"))
}
