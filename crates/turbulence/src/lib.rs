#![deny(unsafe_code)]
//! Turbulence scene.
//!
//! Vortex, source, sink, and uniform emitters plus a drifting wind are
//! sampled on a regular vector grid. Wind is on by default, so the grid
//! keeps moving even with every emitter removed.

use field_studio_core::clock::AnimationClock;
use field_studio_core::error::FieldError;
use field_studio_core::frame::Frame;
use field_studio_core::geometry::Bounds;
use field_studio_core::scene::{scene_bounds, sources_from_params, Scene, DEFAULT_SOURCE_COUNT};
use field_studio_core::settings::{TurbulenceSettings, VisualizationSettings};
use field_studio_core::source::{SourceRegistry, TurbulenceKind, TurbulenceSource};
use field_studio_core::vector::{sample_vector_grid, TurbulenceField, VectorField, VectorSample};
use serde_json::{json, Value};

/// Vector grid over turbulence emitters and wind.
pub struct Turbulence {
    sources: SourceRegistry<TurbulenceSource>,
    settings: TurbulenceSettings,
    clock: AnimationClock,
    bounds: Bounds,
}

impl Turbulence {
    /// Returns `FieldError::InvalidDimensions` if width or height is zero.
    pub fn new(
        width: usize,
        height: usize,
        settings: TurbulenceSettings,
        sources: SourceRegistry<TurbulenceSource>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            sources,
            clock: AnimationClock::new(settings.animation.speed),
            settings,
            bounds: scene_bounds(width, height)?,
        })
    }

    /// Creates a turbulence scene from a JSON params object.
    ///
    /// Default emitters cycle through vortex, source, sink, and uniform.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let bounds = scene_bounds(width, height)?;
        let sources = sources_from_params(params, bounds, seed, TurbulenceKind::ALL)?;
        Self::new(width, height, TurbulenceSettings::from_json(params), sources)
    }

    pub fn sources(&self) -> &SourceRegistry<TurbulenceSource> {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut SourceRegistry<TurbulenceSource> {
        &mut self.sources
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn field(&self) -> TurbulenceField<'_> {
        TurbulenceField::new(self.sources.list(), self.settings.field)
    }

    /// Field value at `(x, y)` at the current clock time.
    pub fn sample(&self, x: f64, y: f64) -> VectorSample {
        self.field().sample(x, y, self.clock.time())
    }
}

impl Scene for Turbulence {
    fn step(&mut self, delta: f64) {
        if self.settings.animation.is_animating {
            self.clock.advance(delta);
        }
    }

    fn frame(&self) -> Frame {
        Frame::Vectors(sample_vector_grid(
            &self.field(),
            self.bounds,
            self.settings.grid_spacing,
            self.clock.time(),
        ))
    }

    fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    fn settings(&self) -> VisualizationSettings {
        VisualizationSettings::Turbulence(self.settings)
    }

    fn params(&self) -> Value {
        let s = &self.settings;
        json!({
            "falloff": s.field.falloff.to_string(),
            "wind_strength": s.field.wind_strength,
            "flow_intensity": s.field.flow_intensity,
            "bias_enabled": s.field.bias.enabled,
            "bias_angle": s.field.bias.angle.to_degrees(),
            "bias_strength": s.field.bias.strength,
            "grid_spacing": s.grid_spacing,
            "animate": s.animation.is_animating,
            "speed": s.animation.speed,
            "sources": self.sources.list(),
        })
    }

    fn param_schema(&self) -> Value {
        let d = TurbulenceSettings::default();
        json!({
            "falloff": {
                "type": "string",
                "default": d.field.falloff.to_string(),
                "options": ["linear", "quadratic", "inverse", "exponential"],
                "description": "Distance attenuation law"
            },
            "wind_strength": {
                "type": "number",
                "default": d.field.wind_strength,
                "min": 0.0,
                "max": 10.0,
                "description": "Strength of the time-varying wind"
            },
            "flow_intensity": {
                "type": "number",
                "default": d.field.flow_intensity,
                "min": 0.0,
                "max": 10.0,
                "description": "Global multiplier on the field"
            },
            "bias_enabled": {
                "type": "boolean",
                "default": d.field.bias.enabled,
                "description": "Add a constant directional bias to every sample"
            },
            "bias_angle": {
                "type": "number",
                "default": d.field.bias.angle.to_degrees(),
                "min": 0.0,
                "max": 360.0,
                "description": "Bias direction in degrees"
            },
            "bias_strength": {
                "type": "number",
                "default": d.field.bias.strength,
                "min": 0.0,
                "max": 10.0,
                "description": "Bias magnitude"
            },
            "grid_spacing": {
                "type": "number",
                "default": d.grid_spacing,
                "min": 5.0,
                "max": 100.0,
                "description": "Distance between sampled vectors"
            },
            "animate": {
                "type": "boolean",
                "default": d.animation.is_animating,
                "description": "Advance the clock on step()"
            },
            "speed": {
                "type": "number",
                "default": d.animation.speed,
                "min": 0.0,
                "max": 5.0,
                "description": "Clock speed multiplier"
            },
            "source_count": {
                "type": "integer",
                "default": DEFAULT_SOURCE_COUNT,
                "min": 0,
                "max": 32,
                "description": "Emitters placed from the seed when no sources are given"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_studio_core::source::TurbulencePatch;

    fn turbulence(seed: u64, params: Value) -> Turbulence {
        Turbulence::from_json(600, 400, seed, &params).unwrap()
    }

    fn emitter(kind: &str) -> Value {
        json!({"id": "turbulence-1", "x": 300.0, "y": 200.0, "strength": 100.0, "kind": kind})
    }

    // ---- Construction tests ----

    #[test]
    fn default_emitters_cycle_kinds() {
        let scene = turbulence(2, json!({"source_count": 4}));
        let kinds: Vec<TurbulenceKind> = scene.sources().list().iter().map(|s| s.kind).collect();
        assert_eq!(kinds, TurbulenceKind::ALL.to_vec());
    }

    #[test]
    fn zero_dimensions_return_error() {
        assert!(matches!(
            Turbulence::from_json(0, 10, 1, &json!({})),
            Err(FieldError::InvalidDimensions)
        ));
    }

    // ---- Frame tests ----

    #[test]
    fn frame_is_a_vector_grid() {
        let scene = turbulence(1, json!({}));
        match scene.frame() {
            Frame::Vectors(samples) => assert_eq!(samples.len(), 24 * 16),
            other => panic!("expected vectors, got {}", other.kind()),
        }
    }

    #[test]
    fn source_pushes_and_sink_pulls() {
        let calm = json!({"wind_strength": 0});
        let with = |kind: &str| {
            let mut params = calm.clone();
            params["sources"] = json!([emitter(kind)]);
            turbulence(1, params).sample(350.0, 200.0)
        };
        assert!(with("source").field_x > 0.0);
        assert!(with("sink").field_x < 0.0);
        let vortex = with("vortex");
        assert!(vortex.field_x.abs() < 1e-12 && vortex.field_y != 0.0);
    }

    #[test]
    fn uniform_emitter_follows_its_angle() {
        let mut source = emitter("uniform");
        source["angle"] = json!(std::f64::consts::FRAC_PI_2);
        let scene = turbulence(1, json!({"wind_strength": 0, "sources": [source]}));
        let s = scene.sample(100.0, 100.0);
        assert!(s.field_x.abs() < 1e-12);
        assert!(s.field_y > 0.0);
    }

    #[test]
    fn wind_alone_moves_with_time() {
        let mut scene = turbulence(1, json!({"source_count": 0}));
        let before = scene.frame();
        assert!(!before.is_empty());
        scene.step(0.5);
        assert_ne!(scene.frame(), before);
    }

    #[test]
    fn calm_empty_scene_is_still() {
        let scene = turbulence(1, json!({"source_count": 0, "wind_strength": 0}));
        if let Frame::Vectors(samples) = scene.frame() {
            assert!(samples.iter().all(|g| g.sample.magnitude == 0.0));
        } else {
            panic!("expected vectors");
        }
    }

    #[test]
    fn patching_angle_rotates_uniform_flow() {
        let mut scene = turbulence(1, json!({"wind_strength": 0, "sources": [emitter("uniform")]}));
        assert!(scene.sample(50.0, 50.0).field_x > 0.0);
        scene
            .sources_mut()
            .update(
                "turbulence-1",
                TurbulencePatch {
                    angle: Some(std::f64::consts::PI),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(scene.sample(50.0, 50.0).field_x < 0.0);
    }

    // ---- Params tests ----

    #[test]
    fn params_round_trip_rebuilds_the_same_scene() {
        let scene = turbulence(8, json!({"falloff": "exponential", "grid_spacing": 40}));
        let rebuilt = Turbulence::from_json(600, 400, 0, &scene.params()).unwrap();
        assert_eq!(rebuilt.settings(), scene.settings());
        assert_eq!(rebuilt.frame(), scene.frame());
    }

    #[test]
    fn param_schema_describes_every_param() {
        let scene = turbulence(1, json!({}));
        let schema = scene.param_schema();
        for key in scene.params().as_object().unwrap().keys().filter(|k| *k != "sources") {
            assert!(schema.get(key).is_some(), "schema missing parameter: {key}");
            assert!(schema[key].get("description").is_some(), "{key} missing 'description'");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn emitter_order_does_not_change_the_field(
                seed in 1_u64..100_000,
                x in 0.0_f64..600.0,
                y in 0.0_f64..400.0,
            ) {
                let scene = turbulence(seed, json!({"source_count": 4}));
                let mut reversed: Vec<TurbulenceSource> = scene.sources().list().to_vec();
                reversed.reverse();
                let params = json!({"sources": reversed});
                let other = turbulence(seed, params);
                let a = scene.sample(x, y);
                let b = other.sample(x, y);
                prop_assert!((a.field_x - b.field_x).abs() < 1e-9);
                prop_assert!((a.field_y - b.field_y).abs() < 1e-9);
            }
        }
    }
}
