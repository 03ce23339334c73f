#![deny(unsafe_code)]
//! WASM bindings for the browser studio.
//!
//! The page owns layout, controls, and drawing. It drives a [`Studio`]
//! once per animation frame: `step(delta)`, then `frame_json()` to get
//! the geometry to draw. Errors cross the boundary as string `JsValue`s.

use field_studio_core::error::FieldError;
use field_studio_core::Scene;
use field_studio_scenes::SceneKind;
use serde_json::Value;
use wasm_bindgen::prelude::*;

fn js_error(e: FieldError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, FieldError> {
    serde_json::to_string(value).map_err(|e| FieldError::Io(e.to_string()))
}

/// One running visualization.
#[wasm_bindgen]
pub struct Studio {
    scene: SceneKind,
}

impl Studio {
    fn build(
        scene: &str,
        width: usize,
        height: usize,
        seed: u32,
        params_json: &str,
    ) -> Result<Self, FieldError> {
        let params: Value = if params_json.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_str(params_json)
                .map_err(|e| FieldError::InvalidSources(format!("invalid params JSON: {e}")))?
        };
        let scene = SceneKind::from_name(scene, width, height, u64::from(seed), &params)?;
        Ok(Self { scene })
    }

    fn frame_string(&self) -> Result<String, FieldError> {
        to_json(&self.scene.frame())
    }
}

#[wasm_bindgen]
impl Studio {
    /// Builds the named scene; `params_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        scene: &str,
        width: usize,
        height: usize,
        seed: u32,
        params_json: &str,
    ) -> Result<Studio, JsValue> {
        Self::build(scene, width, height, seed, params_json).map_err(js_error)
    }

    /// Advances the scene clock by `delta` seconds.
    pub fn step(&mut self, delta: f64) {
        self.scene.step(delta);
    }

    /// Current frame as `{ "type": ..., "data": [...] }`.
    pub fn frame_json(&self) -> Result<String, JsValue> {
        self.frame_string().map_err(js_error)
    }

    pub fn params_json(&self) -> Result<String, JsValue> {
        to_json(&self.scene.params()).map_err(js_error)
    }

    pub fn param_schema_json(&self) -> Result<String, JsValue> {
        to_json(&self.scene.param_schema()).map_err(js_error)
    }

    /// Current settings as the tagged settings union.
    pub fn settings_json(&self) -> Result<String, JsValue> {
        to_json(&self.scene.settings()).map_err(js_error)
    }

    /// Rewinds the clock to 0.
    pub fn reset(&mut self) {
        self.scene.reset();
    }

    pub fn pause(&mut self) {
        self.scene.clock_mut().pause();
    }

    pub fn resume(&mut self) {
        self.scene.clock_mut().resume();
    }

    pub fn time(&self) -> f64 {
        self.scene.clock().time()
    }

    pub fn scene_name(&self) -> String {
        self.scene.name().to_string()
    }

    /// JSON array of scene names.
    pub fn list_scenes() -> String {
        to_json(SceneKind::list_scenes()).unwrap_or_else(|_| "[]".to_string())
    }
}
