#![deny(unsafe_code)]
//! Topography scene.
//!
//! Elevation points (peaks, valleys, saddles, ridges) shape a terrain
//! surface; each frame is the set of iso-elevation contour fragments at
//! the configured interval. Contours keep clear of every point so the
//! markers drawn on top stay readable.

use field_studio_core::clock::AnimationClock;
use field_studio_core::contour::extract_contours;
use field_studio_core::error::FieldError;
use field_studio_core::frame::Frame;
use field_studio_core::geometry::Bounds;
use field_studio_core::noise::NoiseSynth;
use field_studio_core::scalar::evaluate_scalar_field;
use field_studio_core::scene::{scene_bounds, sources_from_params, Scene};
use field_studio_core::settings::{TopographySettings, VisualizationSettings};
use field_studio_core::source::{ElevationKind, ElevationPoint, SourceRegistry};
use serde_json::{json, Value};

/// Contour map over a set of elevation points.
pub struct Topography {
    sources: SourceRegistry<ElevationPoint>,
    settings: TopographySettings,
    noise: NoiseSynth,
    clock: AnimationClock,
    bounds: Bounds,
}

impl Topography {
    /// Creates a topography scene over the given sources.
    ///
    /// Returns `FieldError::InvalidDimensions` if width or height is zero.
    pub fn new(
        width: usize,
        height: usize,
        settings: TopographySettings,
        sources: SourceRegistry<ElevationPoint>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            sources,
            noise: NoiseSynth::new(settings.noise),
            clock: AnimationClock::new(settings.animation.speed),
            settings,
            bounds: scene_bounds(width, height)?,
        })
    }

    /// Creates a topography scene from a JSON params object.
    ///
    /// Sources come from `params["sources"]` or are placed from `seed`,
    /// cycling through peak, valley, saddle, and ridge.
    pub fn from_json(
        width: usize,
        height: usize,
        seed: u64,
        params: &Value,
    ) -> Result<Self, FieldError> {
        let bounds = scene_bounds(width, height)?;
        let sources = sources_from_params(params, bounds, seed, ElevationKind::ALL)?;
        Self::new(width, height, TopographySettings::from_json(params), sources)
    }

    pub fn sources(&self) -> &SourceRegistry<ElevationPoint> {
        &self.sources
    }

    /// Mutable access for dragging, adding, and removing points.
    pub fn sources_mut(&mut self) -> &mut SourceRegistry<ElevationPoint> {
        &mut self.sources
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Terrain elevation at `(x, y)` at the current clock time.
    pub fn elevation_at(&self, x: f64, y: f64) -> f64 {
        evaluate_scalar_field(
            x,
            y,
            self.sources.list(),
            &self.settings.terrain,
            &self.noise,
            self.clock.time(),
        )
    }
}

impl Scene for Topography {
    fn step(&mut self, delta: f64) {
        if self.settings.animation.is_animating {
            self.clock.advance(delta);
        }
    }

    fn frame(&self) -> Frame {
        Frame::Contours(extract_contours(
            self.sources.list(),
            &self.settings.terrain,
            &self.settings.contour,
            &self.noise,
            self.bounds,
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
        VisualizationSettings::Topography(self.settings)
    }

    fn params(&self) -> Value {
        let s = &self.settings;
        json!({
            "min_elevation": s.terrain.min_elevation,
            "max_elevation": s.terrain.max_elevation,
            "base_elevation": s.terrain.base_elevation,
            "ambient_weight": s.terrain.ambient_weight,
            "noise_amplitude": s.terrain.noise_amplitude,
            "noise_drift": s.terrain.noise_drift,
            "contour_interval": s.contour.contour_interval,
            "resolution": s.contour.resolution,
            "noise_scale": s.noise.scale,
            "noise_octaves": s.noise.octaves,
            "noise_persistence": s.noise.persistence,
            "noise_lacunarity": s.noise.lacunarity,
            "noise_seed": s.noise.seed,
            "noise_basis": s.noise.basis.to_string(),
            "animate": s.animation.is_animating,
            "speed": s.animation.speed,
            "sources": self.sources.list(),
        })
    }

    fn param_schema(&self) -> Value {
        let d = TopographySettings::default();
        json!({
            "min_elevation": {
                "type": "number",
                "default": d.terrain.min_elevation,
                "description": "Lowest elevation; terrain is clamped here"
            },
            "max_elevation": {
                "type": "number",
                "default": d.terrain.max_elevation,
                "description": "Highest elevation; terrain is clamped here"
            },
            "base_elevation": {
                "type": "number",
                "default": d.terrain.base_elevation,
                "description": "Elevation the terrain relaxes to far from every point"
            },
            "ambient_weight": {
                "type": "number",
                "default": d.terrain.ambient_weight,
                "min": 0.0,
                "max": 0.001,
                "description": "Pull toward the base elevation; 0 gives a flat weighted average"
            },
            "noise_amplitude": {
                "type": "number",
                "default": d.terrain.noise_amplitude,
                "min": 0.0,
                "max": 100.0,
                "description": "Height of the micro-terrain noise"
            },
            "noise_drift": {
                "type": "number",
                "default": d.terrain.noise_drift,
                "min": 0.0,
                "max": 100.0,
                "description": "Canvas units per second the noise slides along x"
            },
            "contour_interval": {
                "type": "number",
                "default": d.contour.contour_interval,
                "min": 5.0,
                "max": 500.0,
                "description": "Elevation spacing between contour levels"
            },
            "resolution": {
                "type": "number",
                "default": d.contour.resolution,
                "min": 0.25,
                "max": 10.0,
                "description": "Sampling density; the grid step is max(2, floor(20 / resolution))"
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
                "description": "Number of noise octaves; 0 disables noise"
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
                "default": field_studio_core::scene::DEFAULT_SOURCE_COUNT,
                "min": 0,
                "max": 32,
                "description": "Elevation points placed from the seed when no sources are given"
            }
        })
    }
}
