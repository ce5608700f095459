//! Executing a crop plan against encoded image bytes.

use std::collections::HashMap;

use log::{debug, info};

use super::{crop_pixels, decode, encode, resize, FilterType, OutputSettings, RasterError};
use crate::error::CropError;
use crate::resolve::CropPlan;
use crate::session::{CropRequest, ImageProcessor};

/// Longest edge accepted for the intermediate raster of a scaled plan.
const MAX_RESIZE_EDGE: u32 = 16_384;

/// Decode `bytes`, apply `plan` (optional resize, then crop) and encode.
///
/// # Errors
///
/// Returns `RasterError::PlanMismatch` if the plan is inconsistent or was
/// resolved for an image of a different size than `bytes` decodes to.
pub fn apply_plan(
    bytes: &[u8],
    plan: &CropPlan,
    output: OutputSettings,
    filter: FilterType,
) -> Result<Vec<u8>, RasterError> {
    check_plan(plan)?;

    let mut image = decode(bytes)?;
    if image.size() != plan.source {
        return Err(RasterError::PlanMismatch(format!(
            "plan resolved for {}x{} but image decodes to {}x{}",
            plan.source.width, plan.source.height, image.width, image.height
        )));
    }

    if let Some(target) = plan.resize_to {
        image = resize(&image, target.width, target.height, filter)?;
    }

    let rect = plan.rect.to_pixels(image.size());
    debug!("cropping {:?} out of {}x{} raster", rect, image.width, image.height);
    let cropped = crop_pixels(&image, rect)?;
    encode(&cropped, output)
}

/// Reject plans that cannot produce a square crop inside their raster.
fn check_plan(plan: &CropPlan) -> Result<(), RasterError> {
    let mismatch = |reason: String| Err(RasterError::PlanMismatch(reason));

    if plan.source.is_empty() {
        return mismatch(format!("source is {}x{}", plan.source.width, plan.source.height));
    }
    if !plan.scale.is_finite() || plan.scale <= 0.0 {
        return mismatch(format!("scale must be positive, got {}", plan.scale));
    }

    if let Some(target) = plan.resize_to {
        let expected_w = plan.source.width as f64 * plan.scale;
        let expected_h = plan.source.height as f64 * plan.scale;
        // Strategies round the scaled size and never go below one pixel
        if (target.width as f64 - expected_w).abs() > 1.0
            || (target.height as f64 - expected_h).abs() > 1.0
        {
            return mismatch(format!(
                "resize to {}x{} does not match scale {} of {}x{}",
                target.width, target.height, plan.scale, plan.source.width, plan.source.height
            ));
        }
        if target.longer_edge() > MAX_RESIZE_EDGE {
            return mismatch(format!(
                "resize to {}x{} exceeds {MAX_RESIZE_EDGE}px",
                target.width, target.height
            ));
        }
    }

    let raster = plan.raster_size();
    let rect = plan.rect;
    let eps = 1e-6;
    let inside = [rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite())
        && rect.width > 0.0
        && rect.is_square(eps)
        && rect.x >= -eps
        && rect.y >= -eps
        && rect.right() <= raster.width as f64 + eps
        && rect.bottom() <= raster.height as f64 + eps;
    if !inside {
        return mismatch(format!(
            "{:?} is not a square inside {}x{}",
            rect, raster.width, raster.height
        ));
    }
    Ok(())
}

/// In-memory image processor keyed by URI.
///
/// Source images are registered with [`insert`](Self::insert); each processed
/// crop is stored under a fresh `memory://crop/<n>.<ext>` URI.
#[derive(Debug, Default)]
pub struct MemoryProcessor {
    images: HashMap<String, Vec<u8>>,
    next_id: u64,
}

impl MemoryProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(uri.into(), bytes);
    }

    pub fn get(&self, uri: &str) -> Option<&[u8]> {
        self.images.get(uri).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageProcessor for MemoryProcessor {
    fn process(&mut self, request: &CropRequest<'_>) -> Result<String, CropError> {
        let source = request.source.uri();
        let bytes = self
            .images
            .get(source)
            .ok_or_else(|| CropError::ProcessingFailure(format!("no image stored at {source}")))?;

        let output = apply_plan(bytes, &request.plan, request.output, request.filter)?;

        self.next_id += 1;
        let uri = format!("memory://crop/{}.{}", self.next_id, request.output.format.extension());
        info!("stored {} byte crop of {} at {}", output.len(), source, uri);
        self.images.insert(uri.clone(), output);
        Ok(uri)
    }
}
