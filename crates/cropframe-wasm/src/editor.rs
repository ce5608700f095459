//! Interactive crop editor bindings.
//!
//! Wraps [`CropEditor`] for a browser UI. Gesture handlers forward pointer
//! events; the render loop calls `tick` with `performance.now()` and reads the
//! displayed transform back through the getters.
//!
//! # Example
//!
//! ```typescript
//! const editor = new JsCropEditor(img.naturalWidth, img.naturalHeight, 300, { strategy: 'direct_rect' });
//!
//! el.onpointerdown = () => editor.pan_begin();
//! el.onpointermove = (e) => editor.pan_update(e.clientX - x0, e.clientY - y0);
//! el.onpointerup = () => editor.pan_end();
//! el.ondblclick = () => editor.double_tap(performance.now());
//!
//! requestAnimationFrame(function frame(now) {
//!   editor.tick(now);
//!   img.style.transform = `translate(${editor.translate_x}px, ${editor.translate_y}px) scale(${editor.scale})`;
//!   requestAnimationFrame(frame);
//! });
//!
//! const avatar = editor.crop_bytes(new Uint8Array(await file.arrayBuffer()));
//! ```

use std::time::Duration;

use cropframe_core::raster::{apply_plan, FilterType, OutputSettings};
use cropframe_core::{
    CropConfig, CropEditor, CropError, CropFrame, CropPlan, CropStrategy, ImageSize,
    ZoomDirection,
};
use wasm_bindgen::prelude::*;

fn to_js(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Convert a `performance.now()`-style millisecond timestamp.
///
/// Negative or NaN values are treated as time zero; values too large for a
/// `Duration` saturate.
pub(crate) fn timestamp(ms: f64) -> Duration {
    if ms.is_nan() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
}

/// Parse an optional configuration object. `undefined` and `null` mean defaults.
fn config_from_js(config: JsValue) -> Result<CropConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CropConfig::default());
    }
    let config: CropConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?;
    config.validate().map_err(to_js)?;
    Ok(config)
}

/// Crop editor handle for JavaScript.
#[wasm_bindgen]
pub struct JsCropEditor {
    editor: CropEditor,
    strategy: Box<dyn CropStrategy>,
    output: OutputSettings,
    filter: FilterType,
}

impl JsCropEditor {
    pub(crate) fn from_config(
        image: ImageSize,
        frame_side: f64,
        config: CropConfig,
    ) -> Result<Self, CropError> {
        let frame = CropFrame::new(frame_side)?;
        let editor = CropEditor::new(image, frame, &config)?;
        Ok(Self {
            editor,
            strategy: config.strategy.build(),
            output: config.output,
            filter: config.resize_filter,
        })
    }

    pub(crate) fn plan(&mut self) -> Result<CropPlan, CropError> {
        self.editor.settle();
        self.editor.resolve(self.strategy.as_ref())
    }

    pub(crate) fn crop(&mut self, bytes: &[u8]) -> Result<Vec<u8>, CropError> {
        let plan = self.plan()?;
        Ok(apply_plan(bytes, &plan, self.output, self.filter)?)
    }
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Load an image of the given natural size into a square frame.
    ///
    /// # Arguments
    ///
    /// * `image_width` / `image_height` - Natural image size in pixels
    /// * `frame_side` - Crop frame side in CSS pixels
    /// * `config` - Optional partial configuration object (see `CropConfig`)
    #[wasm_bindgen(constructor)]
    pub fn new(
        image_width: u32,
        image_height: u32,
        frame_side: f64,
        config: JsValue,
    ) -> Result<JsCropEditor, JsValue> {
        let config = config_from_js(config)?;
        Self::from_config(ImageSize::new(image_width, image_height), frame_side, config)
            .map_err(to_js)
    }

    pub fn pan_begin(&mut self) -> Result<(), JsValue> {
        self.editor.pan_begin().map_err(to_js)
    }

    /// Total pointer movement since `pan_begin`, in CSS pixels.
    pub fn pan_update(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.editor.pan_update(dx, dy).map_err(to_js)
    }

    pub fn pan_end(&mut self) -> Result<(), JsValue> {
        self.editor.pan_end().map_err(to_js)
    }

    pub fn pinch_begin(&mut self) -> Result<(), JsValue> {
        self.editor.pinch_begin().map_err(to_js)
    }

    /// Current finger distance divided by the distance at `pinch_begin`.
    pub fn pinch_update(&mut self, ratio: f64) -> Result<(), JsValue> {
        self.editor.pinch_update(ratio).map_err(to_js)
    }

    pub fn pinch_end(&mut self) -> Result<(), JsValue> {
        self.editor.pinch_end().map_err(to_js)
    }

    pub fn double_tap(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.editor.double_tap(timestamp(now_ms)).map_err(to_js)
    }

    pub fn zoom_in(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.editor
            .zoom(ZoomDirection::In, timestamp(now_ms))
            .map_err(to_js)
    }

    pub fn zoom_out(&mut self, now_ms: f64) -> Result<(), JsValue> {
        self.editor
            .zoom(ZoomDirection::Out, timestamp(now_ms))
            .map_err(to_js)
    }

    /// Advance animations. Returns `true` while another frame is needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.editor.tick(timestamp(now_ms))
    }

    pub fn settle(&mut self) {
        self.editor.settle();
    }

    pub fn reset(&mut self) {
        self.editor.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.editor.displayed().scale
    }

    #[wasm_bindgen(getter)]
    pub fn translate_x(&self) -> f64 {
        self.editor.displayed().translation.x
    }

    #[wasm_bindgen(getter)]
    pub fn translate_y(&self) -> f64 {
        self.editor.displayed().translation.y
    }

    #[wasm_bindgen(getter)]
    pub fn min_scale(&self) -> f64 {
        self.editor.limits().min
    }

    #[wasm_bindgen(getter)]
    pub fn max_scale(&self) -> f64 {
        self.editor.limits().max
    }

    #[wasm_bindgen(getter)]
    pub fn is_settled(&self) -> bool {
        self.editor.is_settled()
    }

    /// Settle and return the crop plan as a plain object.
    pub fn resolve(&mut self) -> Result<JsValue, JsValue> {
        let plan = self.plan().map_err(to_js)?;
        serde_wasm_bindgen::to_value(&plan).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Settle, then crop and encode the source image bytes.
    pub fn crop_bytes(&mut self, bytes: &[u8]) -> Result<Vec<u8>, JsValue> {
        self.crop(bytes).map_err(to_js)
    }
}

/// Native tests cover the paths that don't construct a `JsValue`.
#[cfg(test)]
mod tests {
    use super::*;
    use cropframe_core::StrategyKind;
    use std::io::Cursor;

    fn editor(width: u32, height: u32) -> JsCropEditor {
        JsCropEditor::from_config(ImageSize::new(width, height), 100.0, CropConfig::default())
            .unwrap()
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp(250.0), Duration::from_millis(250));
        assert_eq!(timestamp(-5.0), Duration::ZERO);
        assert_eq!(timestamp(f64::NAN), Duration::ZERO);
        assert_eq!(timestamp(f64::MAX), Duration::MAX);
        assert_eq!(timestamp(f64::INFINITY), Duration::MAX);
    }

    #[test]
    fn test_huge_timestamps_do_not_panic() {
        let mut ed = editor(400, 400);
        ed.editor.double_tap(timestamp(f64::MAX)).unwrap();
        assert!(!ed.tick(f64::MAX));
        assert_eq!(ed.scale(), 0.5);

        ed.editor.zoom(ZoomDirection::Out, timestamp(1e300)).unwrap();
        ed.settle();
        assert!(ed.is_settled());
    }

    #[test]
    fn test_initial_getters() {
        let ed = editor(400, 200);
        assert_eq!(ed.scale(), 0.5);
        assert_eq!(ed.translate_x(), 0.0);
        assert_eq!(ed.min_scale(), 0.5);
        assert!(ed.is_settled());
    }

    #[test]
    fn test_invalid_frame_rejected() {
        let result =
            JsCropEditor::from_config(ImageSize::new(100, 100), 0.0, CropConfig::default());
        assert!(matches!(result, Err(CropError::InvalidConfig(_))));
    }

    #[test]
    fn test_animation_through_tick() {
        let mut ed = editor(400, 400);
        ed.editor.double_tap(timestamp(0.0)).unwrap();
        assert!(ed.tick(100.0));
        assert!(ed.scale() > 0.25 && ed.scale() < 0.5);
        assert!(!ed.tick(250.0));
        assert_eq!(ed.scale(), 0.5);
        assert!(ed.is_settled());
    }

    #[test]
    fn test_plan_settles_open_gesture() {
        let mut ed = editor(400, 400);
        ed.editor.pinch_begin().unwrap();
        ed.editor.pinch_update(2.0).unwrap();
        let plan = ed.plan().unwrap();
        assert_eq!(plan.scale, 0.5);
        assert_eq!(plan.rect.width, 200.0);
        assert!(ed.is_settled());
    }

    #[test]
    fn test_crop_bytes() {
        let mut ed = editor(40, 80);
        let out = ed.crop(&png(40, 80)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 40));
    }

    #[test]
    fn test_crop_bytes_scaled_raster() {
        let config = CropConfig {
            strategy: StrategyKind::ScaledRaster,
            ..CropConfig::default()
        };
        let mut ed = JsCropEditor::from_config(ImageSize::new(40, 80), 100.0, config).unwrap();
        let out = ed.crop(&png(40, 80)).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
    }

    #[test]
    fn test_crop_garbage_is_processing_failure() {
        let mut ed = editor(40, 80);
        assert!(matches!(
            ed.crop(b"not an image"),
            Err(CropError::ProcessingFailure(_)) | Err(CropError::UnsupportedFormat(_))
        ));
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_with_undefined_config() {
        let ed = JsCropEditor::new(600, 600, 300.0, JsValue::UNDEFINED).unwrap();
        assert_eq!(ed.scale(), 0.5);
    }

    #[wasm_bindgen_test]
    fn test_new_with_partial_config() {
        let config = CropConfig {
            max_scale: 4.0,
            ..CropConfig::default()
        };
        let config = serde_wasm_bindgen::to_value(&config).unwrap();
        let ed = JsCropEditor::new(600, 600, 300.0, config).unwrap();
        assert_eq!(ed.max_scale(), 4.0);
    }

    #[wasm_bindgen_test]
    fn test_gesture_conflict_is_error() {
        let mut ed = JsCropEditor::new(600, 600, 300.0, JsValue::UNDEFINED).unwrap();
        ed.pan_begin().unwrap();
        assert!(ed.pinch_begin().is_err());
    }

    #[wasm_bindgen_test]
    fn test_resolve_returns_object() {
        let mut ed = JsCropEditor::new(600, 600, 300.0, JsValue::UNDEFINED).unwrap();
        let plan = ed.resolve().unwrap();
        assert!(plan.is_object());
    }
}
