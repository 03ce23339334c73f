//! Noise-steered flow field used by the flow-field and streamline views.
//!
//! A uniform base flow whose heading is bent by the noise synthesizer,
//! plus turbulence emitters and wind, all scaled by a global intensity.

use crate::noise::NoiseSynth;
use crate::params::{param_bool, param_degrees, param_f64, param_parsed};
use crate::source::TurbulenceSource;
use crate::vector::{
    superpose, wind_vector, ContributionContext, Falloff, PolarityMode, VectorField, VectorSample,
};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::f64::consts::PI;

/// Base-flow settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowSettings {
    /// Whether the uniform base flow is present at all.
    pub enabled: bool,
    /// Heading of the base flow in radians.
    pub base_angle: f64,
    pub strength: f64,
    /// Radians of heading change per unit of noise.
    pub noise_angle: f64,
    /// Canvas units per time unit the noise pattern slides along x.
    pub noise_drift: f64,
    pub falloff: Falloff,
    pub wind_strength: f64,
    pub intensity: f64,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            base_angle: 0.0,
            strength: 1.0,
            noise_angle: PI,
            noise_drift: 10.0,
            falloff: Falloff::Inverse,
            wind_strength: 0.0,
            intensity: 1.0,
        }
    }
}

impl FlowSettings {
    /// Reads `flow_enabled`, `base_angle` (degrees), `flow_strength`,
    /// `noise_angle` (degrees), `noise_drift`, `falloff`, `wind_strength`,
    /// and `flow_intensity`.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            enabled: param_bool(params, "flow_enabled", d.enabled),
            base_angle: param_degrees(params, "base_angle", d.base_angle),
            strength: param_f64(params, "flow_strength", d.strength),
            noise_angle: param_degrees(params, "noise_angle", d.noise_angle),
            noise_drift: param_f64(params, "noise_drift", d.noise_drift),
            falloff: param_parsed(params, "falloff", d.falloff),
            wind_strength: param_f64(params, "wind_strength", d.wind_strength),
            intensity: param_f64(params, "flow_intensity", d.intensity),
        }
    }
}

/// Flow vector at `(x, y)`.
pub fn evaluate_flow_field(
    x: f64,
    y: f64,
    sources: &[TurbulenceSource],
    noise: &NoiseSynth,
    flow: &FlowSettings,
    time: f64,
) -> VectorSample {
    let base = if flow.enabled {
        let heading = flow.base_angle + flow.noise_angle * noise.sample(x + time * flow.noise_drift, y);
        DVec2::from_angle(heading) * flow.strength
    } else {
        DVec2::ZERO
    };
    let ctx = ContributionContext {
        polarity: PolarityMode::Attract,
        falloff: flow.falloff,
        time,
    };
    let total = base + superpose(x, y, sources, &ctx) + wind_vector(x, y, time, flow.wind_strength);
    VectorSample::from_vector(total * flow.intensity)
}

/// A [`VectorField`] over borrowed turbulence sources and noise.
pub struct FlowField<'a> {
    pub sources: &'a [TurbulenceSource],
    pub noise: &'a NoiseSynth,
    pub settings: FlowSettings,
}

impl VectorField for FlowField<'_> {
    fn sample(&self, x: f64, y: f64, time: f64) -> VectorSample {
        evaluate_flow_field(x, y, self.sources, self.noise, &self.settings, time)
    }
}
