//! Cropframe Core - square avatar cropping engine
//!
//! This crate turns pan, pinch, double-tap and zoom-button input over a fixed
//! square frame into a crop of the source image, and can execute that crop on
//! in-memory JPEG/PNG bytes.
//!
//! # Module Structure
//!
//! - `geometry` - Image sizes, frame, translations and crop rectangles
//! - `transform` - Transform state, scale limits, translation bounds and the
//!   gesture interpreter ([`CropEditor`])
//! - `resolve` - Crop strategies turning a committed transform into a [`CropPlan`]
//! - `raster` - Decode, resize, crop and encode image bytes
//! - `session` - The select / crop / confirm state machine
//! - `config` - Tunables with JSON loading
//! - `error` - Error taxonomy

pub mod config;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod resolve;
pub mod session;
pub mod transform;

pub use config::CropConfig;
pub use error::CropError;
pub use geometry::{CropFrame, CropRect, ImageSize, PixelRect, Translation};
pub use resolve::{CropPlan, CropStrategy, DirectRectCrop, ScaledRasterCrop, StrategyKind};
pub use session::{
    CropRequest, CropSession, CroppedImage, ImageAsset, ImageProcessor, ImageSource,
    SelectedImage, Selection, SessionPhase,
};
pub use transform::{CropEditor, GestureKind, ScaleLimits, TransformState, ZoomDirection};
