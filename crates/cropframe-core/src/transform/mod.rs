//! Viewport transform engine for the square crop frame.
//!
//! This module holds the on-screen transform of the loaded image and the rules
//! that keep it legal:
//!
//! - [`TransformState`] / [`ScaleLimits`] - the viewport model
//! - [`clamp_translation`] - the bounds clamper
//! - [`CropEditor`] - the gesture interpreter (pan, pinch, double-tap, zoom buttons)
//!
//! # Coordinate System
//!
//! - Scale is unitless (screen points per source pixel)
//! - Translation is the offset of the image center from the frame center, in
//!   screen points; positive x moves the image right
//!
//! # Invariant
//!
//! Every committed state covers the frame: `width * scale >= side` and
//! `height * scale >= side`, with the frame fully inside the scaled image.

mod animation;
mod bounds;
mod gesture;
mod state;

pub use animation::{smootherstep, ZoomAnimation};
pub use bounds::{clamp_translation, TranslationBounds};
pub use gesture::{ActiveGesture, CropEditor, GestureKind, ZoomDirection};
pub use state::{ScaleLimits, TransformState};
