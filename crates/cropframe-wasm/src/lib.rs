//! Cropframe WASM - WebAssembly bindings for the avatar crop engine
//!
//! This crate exposes the cropframe-core editor and raster pipeline to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `editor` - Interactive crop editor (gestures, animation, resolution)
//! - `raster` - Stateless measure and crop-plan execution on encoded bytes
//!
//! # Usage
//!
//! ```typescript
//! import init, { measure_image, JsCropEditor } from '@cropframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const size = measure_image(bytes);
//! const editor = new JsCropEditor(size.width, size.height, 300);
//! ```

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod editor;
mod raster;

// Re-export public types
pub use editor::JsCropEditor;
pub use raster::{crop_image, measure_image, JsImageSize};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Debug);
    log::set_max_level(LevelFilter::Info);
}

/// Set the console log level: "off", "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    log::set_max_level(filter);
    Ok(())
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
