use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};

use shoreline_scene_shared::scene_format::SceneDoc;

use crate::input::Shortcuts;
use crate::interact::InteractionSystem;
use crate::loading::LoadController;
use crate::scene::{MeshChild, MeshContent, SceneGraph};

const STATUS_ELEMENT_ID: &str = "loading-status";

/// Main application state for the WASM runtime.
#[wasm_bindgen]
pub struct App {
    scene: SceneGraph,
    controller: LoadController,
    interactions: InteractionSystem,
    shortcuts: Shortcuts,
    canvas: HtmlCanvasElement,
    status_element: Option<Element>,
    last_status: Option<String>,
    begun: bool,
}

#[wasm_bindgen]
impl App {
    /// Create a new App from a canvas id and a TOML scene document.
    pub async fn new(canvas_id: &str, scene_toml: &str) -> Result<App, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Element is not a canvas")?;

        let doc: SceneDoc = toml::from_str(scene_toml)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse scene: {e}")))?;
        let scene = SceneGraph::from_doc(&doc)
            .map_err(|e| JsValue::from_str(&format!("Failed to build scene: {e}")))?;

        let status_element = document.get_element_by_id(STATUS_ELEMENT_ID);
        if status_element.is_none() {
            log::warn!("status element '#{STATUS_ELEMENT_ID}' not found, progress is console-only");
        }

        log::info!(
            "Loaded scene '{}': {} entities, {} asset checks",
            scene.name,
            scene.entities().len(),
            doc.assets.len(),
        );
        log::info!(
            "Controls: WASD move, mouse look, click models to toggle spin, \
             R reset camera, L toggle lighting, G cycle sky colors"
        );

        Ok(App {
            scene,
            controller: LoadController::new(doc.assets),
            interactions: InteractionSystem::from_docs(&doc.interactions),
            shortcuts: Shortcuts::new(),
            canvas,
            status_element,
            last_status: None,
            begun: false,
        })
    }

    /// Run one frame. Called from requestAnimationFrame with a
    /// DOMHighResTimeStamp; the first call arms the asset deadlines.
    pub fn frame(&mut self, time_ms: f64) {
        if !self.begun {
            self.controller.begin(time_ms);
            self.begun = true;
        }
        self.controller.tick(&mut self.scene, time_ms);
        self.interactions.tick(&mut self.scene, time_ms);
        self.render_status();
    }

    /// Keyboard handler, fed `KeyboardEvent.key`.
    pub fn key_down(&mut self, key: &str) {
        self.shortcuts.handle_key(&mut self.scene, key);
    }

    /// Raycaster hit: an entity was clicked.
    pub fn entity_clicked(&mut self, id: &str, time_ms: f64) {
        self.interactions.on_click(&mut self.scene, id, time_ms);
    }

    /// Raycaster hover transition for an entity.
    pub fn entity_hover(&mut self, id: &str, entered: bool) {
        self.interactions.on_hover(&mut self.scene, id, entered);
    }

    /// Loader callback: the asset produced mesh geometry.
    pub fn model_loaded(&mut self, id: &str, positions: Vec<f32>) {
        self.scene
            .attach_mesh(id, MeshContent {
                children: vec![MeshChild { positions }],
            });
        self.controller.on_model_loaded(&mut self.scene, id);
        self.render_status();
    }

    /// Loader callback: the asset failed outright.
    pub fn model_failed(&mut self, id: &str) {
        self.controller.on_model_failed(&mut self.scene, id);
        self.render_status();
    }

    /// Tear down: abandon all pending probes.
    pub fn shutdown(&mut self) {
        self.controller.cancel();
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn render_status(&mut self) {
        let view = self.controller.status();
        if self.last_status.as_deref() == Some(view.text.as_str()) {
            return;
        }
        if let Some(element) = &self.status_element {
            element.set_text_content(Some(&view.text));
            if let (Some(color), Some(html)) = (view.color, element.dyn_ref::<HtmlElement>()) {
                if html.style().set_property("color", &color.to_hex()).is_err() {
                    log::warn!("could not restyle status element");
                }
            }
        }
        log::info!("{}", view.text);
        self.last_status = Some(view.text);
    }
}
