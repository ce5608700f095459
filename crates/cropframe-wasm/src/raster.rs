//! Stateless image bindings: measure source bytes, execute a crop plan.
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const { width, height } = measure_image(bytes);
//! const plan = editor.resolve();
//! const jpeg = crop_image(bytes, plan, { format: 'jpeg', quality: 0.9 });
//! ```

use cropframe_core::raster::{apply_plan, measure, FilterType, OutputSettings, RasterError};
use cropframe_core::{CropError, CropPlan, ImageSize};
use wasm_bindgen::prelude::*;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Measured dimensions of an encoded image.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsImageSize {
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsImageSize {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<ImageSize> for JsImageSize {
    fn from(size: ImageSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

/// Read the dimensions of JPEG or PNG bytes without decoding pixels.
pub(crate) fn measure_bytes(bytes: &[u8]) -> Result<JsImageSize, CropError> {
    match measure(bytes) {
        Ok(size) => Ok(size.into()),
        Err(RasterError::UnsupportedFormat(format)) => Err(CropError::UnsupportedFormat(format)),
        Err(err) => Err(CropError::MeasurementFailure(err.to_string())),
    }
}

/// Measure an encoded image.
///
/// # Errors
///
/// Returns an error for formats other than JPEG and PNG, or for bytes whose
/// header cannot be read.
#[wasm_bindgen]
pub fn measure_image(bytes: &[u8]) -> Result<JsImageSize, JsValue> {
    measure_bytes(bytes).map_err(to_js)
}

/// Execute a crop plan (as returned by `JsCropEditor.resolve`) on source bytes.
///
/// # Arguments
///
/// * `bytes` - Encoded JPEG or PNG source image
/// * `plan` - Crop plan object
/// * `output` - Optional `{ format, quality }`; defaults to PNG
/// * `use_lanczos` - Use Lanczos3 for the scaled-raster resize, otherwise bilinear
#[wasm_bindgen]
pub fn crop_image(
    bytes: &[u8],
    plan: JsValue,
    output: JsValue,
    use_lanczos: bool,
) -> Result<Vec<u8>, JsValue> {
    let plan: CropPlan = serde_wasm_bindgen::from_value(plan)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop plan: {}", e)))?;
    let output: OutputSettings = if output.is_undefined() || output.is_null() {
        OutputSettings::default()
    } else {
        serde_wasm_bindgen::from_value(output)
            .map_err(|e| JsValue::from_str(&format!("Invalid output settings: {}", e)))?
    };
    apply_plan(bytes, &plan, output, filter(use_lanczos)).map_err(to_js)
}

fn filter(use_lanczos: bool) -> FilterType {
    if use_lanczos {
        FilterType::Lanczos3
    } else {
        FilterType::Bilinear
    }
}
