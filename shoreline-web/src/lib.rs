//! Shoreline WASM Web Runtime
//!
//! Drives the declarative scene demos in the browser: builds a runtime
//! scene graph from a TOML scene document, verifies that model assets
//! actually produced geometry (substituting fallback primitives when they
//! did not), and handles click/hover/keyboard interaction. Rendering,
//! asset decoding, and animation tweening live in the host engine.

#[cfg(target_arch = "wasm32")]
mod app;
pub mod input;
pub mod interact;
pub mod loading;
pub mod scene;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point — called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Shoreline web runtime initialized");
}

/// Create a new application instance from a TOML scene document.
///
/// Called from JavaScript after fetching the scene file.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn create_app(canvas_id: String, scene_toml: String) -> Result<app::App, JsValue> {
    app::App::new(&canvas_id, &scene_toml).await
}
