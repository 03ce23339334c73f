#![deny(unsafe_code)]
//! Scene registry: maps scene names to implementations and writes frames
//! to disk.
//!
//! This crate sits between `field-studio-core` (which defines the `Scene`
//! trait) and the individual scene crates. Both the CLI and the WASM
//! bindings depend on it so dispatch lives in one place.

pub mod export;

use field_studio_core::clock::AnimationClock;
use field_studio_core::error::FieldError;
use field_studio_core::frame::Frame;
use field_studio_core::settings::VisualizationSettings;
use field_studio_core::Scene;
use field_studio_flow::FlowScene;
use field_studio_multipole::Multipole;
use field_studio_topography::Topography;
use field_studio_turbulence::Turbulence;
use serde_json::Value;
use tracing::debug;

/// All available scene names.
const SCENE_NAMES: &[&str] = &["topography", "multipole", "flow-field", "turbulence"];

/// Enumeration of all available visualizations.
///
/// Wraps each scene implementation and delegates `Scene` trait methods.
/// Use [`SceneKind::from_name`] for string-based construction (CLI, WASM).
pub enum SceneKind {
    Topography(Topography),
    Multipole(Multipole),
    FlowField(FlowScene),
    Turbulence(Turbulence),
}

impl SceneKind {
    /// Constructs a scene by name.
    ///
    /// Returns `FieldError::UnknownScene` if the name is not recognized.
    pub fn from_name(
        name: &str,
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let scene = match name {
            "topography" => SceneKind::Topography(Topography::from_json(width, height, seed, params)?),
            "multipole" => SceneKind::Multipole(Multipole::from_json(width, height, seed, params)?),
            "flow-field" => SceneKind::FlowField(FlowScene::from_json(width, height, seed, params)?),
            "turbulence" => SceneKind::Turbulence(Turbulence::from_json(width, height, seed, params)?),
            _ => return Err(FieldError::UnknownScene(name.to_string())),
        };
        debug!(scene = name, width, height, seed, "scene constructed");
        Ok(scene)
    }

    /// Returns a slice of all recognized scene names.
    pub fn list_scenes() -> &'static [&'static str] {
        SCENE_NAMES
    }

    /// Registry name of this scene.
    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Topography(_) => "topography",
            SceneKind::Multipole(_) => "multipole",
            SceneKind::FlowField(_) => "flow-field",
            SceneKind::Turbulence(_) => "turbulence",
        }
    }

    fn inner(&self) -> &dyn Scene {
        match self {
            SceneKind::Topography(s) => s,
            SceneKind::Multipole(s) => s,
            SceneKind::FlowField(s) => s,
            SceneKind::Turbulence(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Scene {
        match self {
            SceneKind::Topography(s) => s,
            SceneKind::Multipole(s) => s,
            SceneKind::FlowField(s) => s,
            SceneKind::Turbulence(s) => s,
        }
    }
}

impl Scene for SceneKind {
    fn step(&mut self, delta: f64) {
        self.inner_mut().step(delta);
    }

    fn frame(&self) -> Frame {
        self.inner().frame()
    }

    fn clock(&self) -> &AnimationClock {
        self.inner().clock()
    }

    fn clock_mut(&mut self) -> &mut AnimationClock {
        self.inner_mut().clock_mut()
    }

    fn settings(&self) -> VisualizationSettings {
        self.inner().settings()
    }

    fn params(&self) -> Value {
        self.inner().params()
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }
}
