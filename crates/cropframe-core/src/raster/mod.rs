//! Raster pipeline: the image-processing side of a crop.
//!
//! Turns a [`CropPlan`](crate::resolve::CropPlan) into encoded output bytes:
//!
//! 1. [`decode`] JPEG/PNG source bytes to RGB
//! 2. [`resize`] to the plan's intermediate raster (scaled-raster plans only)
//! 3. [`crop_pixels`] the plan rectangle, snapped to whole pixels
//! 4. [`encode`] as PNG or JPEG
//!
//! All operations are synchronous and single-threaded.

mod crop;
mod decode;
mod encode;
mod processor;
mod resize;
mod types;

pub use crop::crop_pixels;
pub use decode::{decode, measure};
pub use encode::encode;
pub use processor::{apply_plan, MemoryProcessor};
pub use resize::resize;
pub use types::{DecodedImage, FilterType, OutputFormat, OutputSettings, RasterError, SourceFormat};
