#![deny(unsafe_code)]
//! Flow-field scene.
//!
//! A uniform base flow, bent by the noise synthesizer and disturbed by
//! turbulence sources, is traced into streamlines from a jittered seed
//! lattice. The noise pattern drifts with the clock, so the lines sway
//! over time.

use field_studio_core::clock::AnimationClock;
use field_studio_core::error::FieldError;
use field_studio_core::flow::{evaluate_flow_field, FlowField};
use field_studio_core::frame::Frame;
use field_studio_core::geometry::{Bounds, Point};
use field_studio_core::noise::NoiseSynth;
use field_studio_core::scene::{scene_bounds, sources_from_params, Scene, DEFAULT_SOURCE_COUNT};
use field_studio_core::settings::{FlowFieldSettings, VisualizationSettings};
use field_studio_core::source::{SourceRegistry, TurbulenceKind, TurbulenceSource};
use field_studio_core::streamline::{seed_points, trace_streamlines, StreamlineConfig};
use field_studio_core::vector::VectorSample;
use serde_json::{json, Value};

/// Streamlines through a noise-steered flow.
pub struct FlowScene {
    sources: SourceRegistry<TurbulenceSource>,
    settings: FlowFieldSettings,
    noise: NoiseSynth,
    clock: AnimationClock,
    bounds: Bounds,
    seeds: Vec<Point>,
}

impl FlowScene {
    /// Creates a flow-field scene. The seed lattice is fixed at construction
    /// so streamlines keep their starting points while the field animates.
    ///
    /// Returns `FieldError::InvalidDimensions` if width or height is zero.
    pub fn new(
        width: usize,
        height: usize,
        seed: u64,
        settings: FlowFieldSettings,
        sources: SourceRegistry<TurbulenceSource>,
    ) -> Result<Self, FieldError> {
        let bounds = scene_bounds(width, height)?;
        let lines = &settings.streamlines;
        Ok(Self {
            sources,
            noise: NoiseSynth::new(settings.noise),
            clock: AnimationClock::new(settings.animation.speed),
            seeds: seed_points(bounds, lines.spacing, lines.jitter, seed),
            settings,
            bounds,
        })
    }

    /// Creates a flow-field scene from a JSON params object.
    ///
    /// Default sources cycle through vortex, source, and sink emitters.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let bounds = scene_bounds(width, height)?;
        let sources = sources_from_params(params, bounds, seed, TurbulenceKind::ALL)?;
        Self::new(width, height, seed, FlowFieldSettings::from_json(params), sources)
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

    /// Streamline starting points.
    pub fn seeds(&self) -> &[Point] {
        &self.seeds
    }

    /// Flow vector at `(x, y)` at the current clock time.
    pub fn sample(&self, x: f64, y: f64) -> VectorSample {
        evaluate_flow_field(
            x,
            y,
            self.sources.list(),
            &self.noise,
            &self.settings.flow,
            self.clock.time(),
        )
    }
}

impl Scene for FlowScene {
    fn step(&mut self, delta: f64) {
        if self.settings.animation.is_animating {
            self.clock.advance(delta);
        }
    }

    fn frame(&self) -> Frame {
        let field = FlowField {
            sources: self.sources.list(),
            noise: &self.noise,
            settings: self.settings.flow,
        };
        let lines = &self.settings.streamlines;
        let config = StreamlineConfig::new(lines.steps, lines.step_size, self.bounds);
        Frame::Streamlines(trace_streamlines(
            &field,
            &self.seeds,
            self.clock.time(),
            &config,
        ))
    }

    fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    fn settings(&self) -> VisualizationSettings {
        VisualizationSettings::FlowField(self.settings)
    }

    fn params(&self) -> Value {
        let s = &self.settings;
        json!({
            "flow_enabled": s.flow.enabled,
            "base_angle": s.flow.base_angle.to_degrees(),
            "flow_strength": s.flow.strength,
            "noise_angle": s.flow.noise_angle.to_degrees(),
            "noise_drift": s.flow.noise_drift,
            "falloff": s.flow.falloff.to_string(),
            "wind_strength": s.flow.wind_strength,
            "flow_intensity": s.flow.intensity,
            "noise_scale": s.noise.scale,
            "noise_octaves": s.noise.octaves,
            "noise_persistence": s.noise.persistence,
            "noise_lacunarity": s.noise.lacunarity,
            "noise_seed": s.noise.seed,
            "noise_basis": s.noise.basis.to_string(),
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
        let d = FlowFieldSettings::default();
        json!({
            "flow_enabled": {
                "type": "boolean",
                "default": d.flow.enabled,
                "description": "Include the uniform base flow"
            },
            "base_angle": {
                "type": "number",
                "default": d.flow.base_angle.to_degrees(),
                "min": 0.0,
                "max": 360.0,
                "description": "Heading of the base flow in degrees"
            },
            "flow_strength": {
                "type": "number",
                "default": d.flow.strength,
                "min": 0.0,
                "max": 10.0,
                "description": "Magnitude of the base flow"
            },
            "noise_angle": {
                "type": "number",
                "default": d.flow.noise_angle.to_degrees(),
                "min": 0.0,
                "max": 720.0,
                "description": "Degrees of heading change per unit of noise"
            },
            "noise_drift": {
                "type": "number",
                "default": d.flow.noise_drift,
                "min": 0.0,
                "max": 100.0,
                "description": "Canvas units per second the noise slides along x"
            },
            "falloff": {
                "type": "string",
                "default": d.flow.falloff.to_string(),
                "options": ["linear", "quadratic", "inverse", "exponential"],
                "description": "Distance attenuation of turbulence sources"
            },
            "wind_strength": {
                "type": "number",
                "default": d.flow.wind_strength,
                "min": 0.0,
                "max": 10.0,
                "description": "Strength of the time-varying wind perturbation"
            },
            "flow_intensity": {
                "type": "number",
                "default": d.flow.intensity,
                "min": 0.0,
                "max": 10.0,
                "description": "Global multiplier on the flow"
            },
            "noise_scale": {
                "type": "number",
                "default": d.noise.scale,
                "min": 0.001,
                "max": 0.1,
                "description": "Frequency of the first noise octave"
            },
            "noise_octaves": {
                "type": "integer",
                "default": d.noise.octaves,
                "min": 0,
                "max": 8,
                "description": "Number of noise octaves; 0 gives a straight flow"
            },
            "noise_persistence": {
                "type": "number",
                "default": d.noise.persistence,
                "min": 0.0,
                "max": 1.0,
                "description": "Amplitude multiplier between octaves"
            },
            "noise_lacunarity": {
                "type": "number",
                "default": d.noise.lacunarity,
                "min": 1.0,
                "max": 4.0,
                "description": "Frequency multiplier between octaves"
            },
            "noise_seed": {
                "type": "integer",
                "default": d.noise.seed,
                "description": "Offset added to noise coordinates"
            },
            "noise_basis": {
                "type": "string",
                "default": d.noise.basis.to_string(),
                "options": ["trig", "perlin"],
                "description": "Noise function summed across octaves"
            },
            "streamline_steps": {
                "type": "integer",
                "default": d.streamlines.steps,
                "min": 1,
                "max": 2000,
                "description": "Maximum points per streamline"
            },
            "step_size": {
                "type": "number",
                "default": d.streamlines.step_size,
                "min": 0.1,
                "max": 20.0,
                "description": "Distance between consecutive streamline points"
            },
            "seed_spacing": {
                "type": "number",
                "default": d.streamlines.spacing,
                "min": 5.0,
                "max": 200.0,
                "description": "Distance between streamline seeds"
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
                "description": "Turbulence sources placed from the seed when no sources are given"
            }
        })
    }
}
