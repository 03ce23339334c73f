#![deny(unsafe_code)]
//! Multipole scene.
//!
//! Poles of five kinds (polar, attractor, repeller, vortex, quantum)
//! superpose into a force field. Each frame samples that field on a
//! regular grid, or, with `field_lines` on, traces streamlines from a
//! jittered seed lattice. Quantum poles oscillate with the clock, so the
//! field animates even when no pole moves.

use field_studio_core::clock::AnimationClock;
use field_studio_core::error::FieldError;
use field_studio_core::frame::Frame;
use field_studio_core::geometry::Bounds;
use field_studio_core::scene::{scene_bounds, sources_from_params, Scene, DEFAULT_SOURCE_COUNT};
use field_studio_core::settings::{MultipoleSettings, VisualizationSettings};
use field_studio_core::source::{Pole, PoleKind, SourceRegistry};
use field_studio_core::streamline::{seed_points, trace_streamlines, StreamlineConfig};
use field_studio_core::vector::{sample_vector_grid, PoleField, VectorField, VectorSample};
use serde_json::{json, Value};

/// Force field of a set of poles.
pub struct Multipole {
    sources: SourceRegistry<Pole>,
    settings: MultipoleSettings,
    clock: AnimationClock,
    bounds: Bounds,
    seed: u64,
}

impl Multipole {
    /// Creates a multipole scene; `seed` drives the field-line seed jitter.
    ///
    /// Returns `FieldError::InvalidDimensions` if width or height is zero.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        settings: MultipoleSettings,
        sources: SourceRegistry<Pole>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            sources,
            clock: AnimationClock::new(settings.animation.speed),
            settings,
            bounds: scene_bounds(width, height)?,
            seed,
        })
    }

    /// Creates a multipole scene from a JSON params object.
    ///
    /// Default poles cycle through the five kinds in declaration order.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let bounds = scene_bounds(width, height)?;
        let sources = sources_from_params(params, bounds, seed, PoleKind::ALL)?;
        Self::new(width, height, seed, MultipoleSettings::from_json(params), sources)
    }

    pub fn sources(&self) -> &SourceRegistry<Pole> {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut SourceRegistry<Pole> {
        &mut self.sources
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn field(&self) -> PoleField<'_> {
        PoleField::new(self.sources.list(), self.settings.field)
    }

    /// Field value at `(x, y)` at the current clock time.
    pub fn sample(&self, x: f64, y: f64) -> VectorSample {
        self.field().sample(x, y, self.clock.time())
    }
}

impl Scene for Multipole {
    fn step(&mut self, delta: f64) {
        if self.settings.animation.is_animating {
            self.clock.advance(delta);
        }
    }

    fn frame(&self) -> Frame {
        let field = self.field();
        let time = self.clock.time();
        if self.settings.field_lines {
            let lines = &self.settings.streamlines;
            let seeds = seed_points(self.bounds, lines.spacing, lines.jitter, self.seed);
            let config = StreamlineConfig::new(lines.steps, lines.step_size, self.bounds);
            Frame::Streamlines(trace_streamlines(&field, &seeds, time, &config))
        } else {
            Frame::Vectors(sample_vector_grid(
                &field,
                self.bounds,
                self.settings.grid_spacing,
                time,
            ))
        }
    }

    fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    fn settings(&self) -> VisualizationSettings {
        VisualizationSettings::Multipole(self.settings)
    }

    fn params(&self) -> Value {
        let s = &self.settings;
        json!({
            "bias_enabled": s.field.bias.enabled,
            "bias_angle": s.field.bias.angle.to_degrees(),
            "bias_strength": s.field.bias.strength,
            "polarity": s.field.polarity.to_string(),
            "falloff": s.field.falloff.to_string(),
            "wind_strength": s.field.wind_strength,
            "flow_intensity": s.field.flow_intensity,
            "grid_spacing": s.grid_spacing,
            "field_lines": s.field_lines,
            "streamline_steps": s.streamlines.steps,
            "step_size": s.streamlines.step_size,
            "seed_spacing": s.streamlines.spacing,
            "seed_jitter": s.streamlines.jitter,
            "animate": s.animation.is_animating,
            "speed": s.animation.speed,
            "sources": self.sources.list(),
        })
    }

    fn param_schema(&self) -> Value {
        let d = MultipoleSettings::default();
        json!({
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
            "polarity": {
                "type": "string",
                "default": d.field.polarity.to_string(),
                "options": ["attract", "repel"],
                "description": "Global mode composed with each polar pole's sign"
            },
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
                "description": "Strength of the time-varying wind perturbation"
            },
            "flow_intensity": {
                "type": "number",
                "default": d.field.flow_intensity,
                "min": 0.0,
                "max": 10.0,
                "description": "Global multiplier on the field"
            },
            "grid_spacing": {
                "type": "number",
                "default": d.grid_spacing,
                "min": 5.0,
                "max": 100.0,
                "description": "Distance between sampled vectors"
            },
            "field_lines": {
                "type": "boolean",
                "default": d.field_lines,
                "description": "Trace field lines instead of sampling a vector grid"
            },
            "streamline_steps": {
                "type": "integer",
                "default": d.streamlines.steps,
                "min": 1,
                "max": 2000,
                "description": "Maximum points per field line"
            },
            "step_size": {
                "type": "number",
                "default": d.streamlines.step_size,
                "min": 0.1,
                "max": 20.0,
                "description": "Distance between consecutive field-line points"
            },
            "seed_spacing": {
                "type": "number",
                "default": d.streamlines.spacing,
                "min": 5.0,
                "max": 200.0,
                "description": "Distance between field-line seeds"
            },
            "seed_jitter": {
                "type": "number",
                "default": d.streamlines.jitter,
                "min": 0.0,
                "max": 50.0,
                "description": "Maximum random seed displacement per axis"
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
                "description": "Poles placed from the seed when no sources are given"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_studio_core::source::PolePatch;
    use field_studio_core::vector::{Falloff, PolarityMode};

    fn multipole(seed: u64, params: Value) -> Multipole {
        Multipole::from_json(600, 400, seed, &params).unwrap()
    }

    fn single_pole(kind: &str, extra: Value) -> Multipole {
        let mut pole = json!({"id": "pole-1", "x": 300.0, "y": 200.0, "strength": 100.0, "kind": kind});
        if let (Some(obj), Some(more)) = (pole.as_object_mut(), extra.as_object()) {
            obj.extend(more.clone());
        }
        multipole(1, json!({"sources": [pole]}))
    }

    // ---- Construction tests ----

    #[test]
    fn default_poles_cycle_kinds() {
        let scene = multipole(5, json!({"source_count": 5}));
        let kinds: Vec<PoleKind> = scene.sources().list().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, PoleKind::ALL.to_vec());
    }

    #[test]
    fn zero_dimensions_return_error() {
        assert!(Multipole::from_json(0, 0, 1, &json!({})).is_err());
    }

    #[test]
    fn from_json_reads_field_settings() {
        let scene = multipole(1, json!({"falloff": "quadratic", "polarity": "repel"}));
        match scene.settings() {
            VisualizationSettings::Multipole(s) => {
                assert_eq!(s.field.falloff, Falloff::Quadratic);
                assert_eq!(s.field.polarity, PolarityMode::Repel);
            }
            other => panic!("wrong settings variant: {other:?}"),
        }
    }

    // ---- Frame tests ----

    #[test]
    fn vector_frame_covers_the_grid() {
        let scene = multipole(1, json!({"grid_spacing": 50}));
        match scene.frame() {
            Frame::Vectors(samples) => {
                assert_eq!(samples.len(), 12 * 8);
                assert_eq!((samples[0].x, samples[0].y), (25.0, 25.0));
            }
            other => panic!("expected vectors, got {}", other.kind()),
        }
    }

    #[test]
    fn field_lines_frame_traces_streamlines() {
        let scene = multipole(1, json!({"field_lines": true, "seed_spacing": 60}));
        match scene.frame() {
            Frame::Streamlines(lines) => {
                assert!(!lines.is_empty());
                assert!(lines.iter().all(|l| l.points.len() >= 2));
            }
            other => panic!("expected streamlines, got {}", other.kind()),
        }
    }

    #[test]
    fn attractor_points_inward_repeller_outward() {
        let attractor = single_pole("attractor", json!({}));
        let repeller = single_pole("repeller", json!({}));
        assert!(attractor.sample(400.0, 200.0).field_x < 0.0);
        assert!(repeller.sample(400.0, 200.0).field_x > 0.0);
    }

    #[test]
    fn global_polarity_flips_polar_poles_only() {
        let polar = json!({"id": "pole-1", "x": 300.0, "y": 200.0, "strength": 100.0, "kind": "polar"});
        let attractor = json!({"id": "pole-1", "x": 300.0, "y": 200.0, "strength": 100.0, "kind": "attractor"});
        let sample = |pole: &Value, mode: &str| {
            multipole(1, json!({"sources": [pole], "polarity": mode})).sample(400.0, 200.0)
        };
        assert!(sample(&polar, "attract").field_x < 0.0);
        assert!(sample(&polar, "repel").field_x > 0.0);
        assert_eq!(sample(&attractor, "attract"), sample(&attractor, "repel"));
    }

    #[test]
    fn quantum_pole_oscillates_over_time() {
        let mut scene = single_pole("quantum", json!({"phase": 0.0}));
        let a = scene.sample(350.0, 200.0);
        scene.step(std::f64::consts::FRAC_PI_2);
        let b = scene.sample(350.0, 200.0);
        assert_ne!(a, b);
    }

    #[test]
    fn patched_strength_scales_field() {
        let mut scene = single_pole("attractor", json!({}));
        let before = scene.sample(400.0, 200.0).magnitude;
        scene
            .sources_mut()
            .update(
                "pole-1",
                PolePatch {
                    strength: Some(200.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let after = scene.sample(400.0, 200.0).magnitude;
        assert!((after - 2.0 * before).abs() < 1e-12);
    }

    // ---- Params tests ----

    #[test]
    fn params_round_trip_rebuilds_the_same_scene() {
        let scene = multipole(21, json!({"falloff": "linear", "wind_strength": 2.0}));
        let rebuilt = Multipole::from_json(600, 400, 21, &scene.params()).unwrap();
        assert_eq!(rebuilt.sources().list(), scene.sources().list());
        assert_eq!(rebuilt.settings(), scene.settings());
    }

    #[test]
    fn param_schema_describes_every_param() {
        let scene = multipole(1, json!({}));
        let schema = scene.param_schema();
        for key in scene.params().as_object().unwrap().keys().filter(|k| *k != "sources") {
            assert!(schema.get(key).is_some(), "schema missing parameter: {key}");
            assert!(schema[key].get("default").is_some(), "{key} missing 'default'");
        }
    }

    // ---- Determinism tests ----

    #[test]
    fn same_seed_same_frame() {
        let a = multipole(13, json!({"field_lines": true}));
        let b = multipole(13, json!({"field_lines": true}));
        assert_eq!(a.frame(), b.frame());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn grid_samples_are_finite(seed in 1_u64..100_000, time in 0.0_f64..100.0) {
                let mut scene = multipole(seed, json!({"source_count": 5, "wind_strength": 1.0}));
                scene.step(time);
                if let Frame::Vectors(samples) = scene.frame() {
                    for g in &samples {
                        prop_assert!(g.sample.magnitude.is_finite());
                        prop_assert!(g.sample.angle.is_finite());
                    }
                } else {
                    prop_assert!(false, "expected vectors");
                }
            }
        }
    }
}
