//! Vector fields built from superposed point-source contributions.
//!
//! A query accumulates, in order: an optional directional bias, one term
//! per source (skipped when the query sits on the source), and a wind
//! perturbation; the total is then scaled by the flow intensity. Source
//! terms are independent of each other, so the field is a pure
//! superposition and the order of the source list never matters.

use crate::geometry::Bounds;
use crate::params::{param_bool, param_degrees, param_f64, param_parsed};
use crate::source::{Pole, PoleKind, TurbulenceKind, TurbulenceSource};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Source terms closer than this to the query are skipped.
pub const MIN_DISTANCE: f64 = 1.0;
/// K1: converts source strength into force units.
pub const FORCE_SCALE: f64 = 0.01;
/// K2: distance softening of the inverse falloff, `1 / (d * K2 + 1)`.
pub const DISTANCE_SOFTENING: f64 = 0.1;
/// Spatial frequency of the quantum pole oscillation.
pub const QUANTUM_WAVENUMBER: f64 = 0.05;
/// Scale applied to `wind_strength`.
pub const WIND_SCALE: f64 = 0.02;
/// Upper bound on up-front reservations sized from caller settings.
pub(crate) const MAX_RESERVE: usize = 1024;

/// Field value at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorSample {
    pub field_x: f64,
    pub field_y: f64,
    /// `atan2(field_y, field_x)` in radians.
    pub angle: f64,
    pub magnitude: f64,
}

impl VectorSample {
    pub fn from_vector(v: DVec2) -> Self {
        Self {
            field_x: v.x,
            field_y: v.y,
            angle: v.y.atan2(v.x),
            magnitude: v.x.hypot(v.y),
        }
    }

    pub fn vector(&self) -> DVec2 {
        DVec2::new(self.field_x, self.field_y)
    }
}

/// Distance attenuation law for source terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Falloff {
    /// `max(0, 1 - d/r)`.
    Linear,
    /// `max(0, 1 - d/r)²`.
    Quadratic,
    /// `1 / (d * K2 + 1)`; ignores the radius.
    #[default]
    Inverse,
    /// `exp(-d/r)`.
    Exponential,
}

impl Falloff {
    /// Attenuation at distance `d` for a source of `radius`.
    ///
    /// Radius-based laws give 0 for a non-positive radius.
    pub fn weight(self, d: f64, radius: f64) -> f64 {
        match self {
            Falloff::Inverse => 1.0 / (d * DISTANCE_SOFTENING + 1.0),
            _ if radius <= 0.0 => 0.0,
            Falloff::Linear => (1.0 - d / radius).max(0.0),
            Falloff::Quadratic => (1.0 - d / radius).max(0.0).powi(2),
            Falloff::Exponential => (-d / radius).exp(),
        }
    }
}

impl FromStr for Falloff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Falloff::Linear),
            "quadratic" => Ok(Falloff::Quadratic),
            "inverse" => Ok(Falloff::Inverse),
            "exponential" => Ok(Falloff::Exponential),
            other => Err(format!("unknown falloff: {other}")),
        }
    }
}

impl fmt::Display for Falloff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Falloff::Linear => "linear",
            Falloff::Quadratic => "quadratic",
            Falloff::Inverse => "inverse",
            Falloff::Exponential => "exponential",
        })
    }
}

/// Global polarity applied to [`PoleKind::Polar`] poles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolarityMode {
    #[default]
    Attract,
    Repel,
}

impl PolarityMode {
    /// Whether a pole of the given sign pulls the query toward itself.
    ///
    /// `attract XOR NOT positive`: in attract mode positive poles attract
    /// and negative poles repel; repel mode swaps both.
    pub fn attracts(self, is_positive: bool) -> bool {
        (self == PolarityMode::Attract) ^ !is_positive
    }
}

impl FromStr for PolarityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attract" => Ok(PolarityMode::Attract),
            "repel" => Ok(PolarityMode::Repel),
            other => Err(format!("unknown polarity mode: {other}")),
        }
    }
}

impl fmt::Display for PolarityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PolarityMode::Attract => "attract",
            PolarityMode::Repel => "repel",
        })
    }
}

/// A constant vector seeded into every sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalBias {
    pub enabled: bool,
    /// Radians.
    pub angle: f64,
    pub strength: f64,
}

impl Default for DirectionalBias {
    fn default() -> Self {
        Self {
            enabled: false,
            angle: 0.0,
            strength: 1.0,
        }
    }
}

impl DirectionalBias {
    pub fn vector(&self) -> DVec2 {
        if self.enabled {
            DVec2::from_angle(self.angle) * self.strength
        } else {
            DVec2::ZERO
        }
    }
}

/// Frequencies of the wind perturbation: two cosine waves per axis.
///
/// `wx = cos(x·a + t·b) + cos(y·c + t·d)`, `wy = cos(y·e + t·f) + cos(x·g + t·h)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindWaves {
    pub x_space_a: f64,
    pub x_time_a: f64,
    pub x_space_b: f64,
    pub x_time_b: f64,
    pub y_space_a: f64,
    pub y_time_a: f64,
    pub y_space_b: f64,
    pub y_time_b: f64,
}

impl WindWaves {
    pub const DEFAULT: WindWaves = WindWaves {
        x_space_a: 0.01,
        x_time_a: 0.5,
        x_space_b: 0.013,
        x_time_b: 0.3,
        y_space_a: 0.011,
        y_time_a: 0.4,
        y_space_b: 0.009,
        y_time_b: 0.6,
    };

    /// Unscaled wind at `(x, y)` and `time`; each axis lies in `[-2, 2]`.
    pub fn at(&self, x: f64, y: f64, time: f64) -> DVec2 {
        DVec2::new(
            (x * self.x_space_a + time * self.x_time_a).cos()
                + (y * self.x_space_b + time * self.x_time_b).cos(),
            (y * self.y_space_a + time * self.y_time_a).cos()
                + (x * self.y_space_b + time * self.y_time_b).cos(),
        )
    }
}

/// Wind perturbation scaled by `wind_strength · WIND_SCALE`.
pub fn wind_vector(x: f64, y: f64, time: f64, wind_strength: f64) -> DVec2 {
    if wind_strength == 0.0 {
        return DVec2::ZERO;
    }
    WindWaves::DEFAULT.at(x, y, time) * (wind_strength * WIND_SCALE)
}

/// Modifiers of a source-driven vector field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorFieldSettings {
    pub bias: DirectionalBias,
    pub polarity: PolarityMode,
    pub falloff: Falloff,
    pub wind_strength: f64,
    /// Final multiplier on the accumulated vector.
    pub flow_intensity: f64,
}

impl Default for VectorFieldSettings {
    fn default() -> Self {
        Self {
            bias: DirectionalBias::default(),
            polarity: PolarityMode::Attract,
            falloff: Falloff::Inverse,
            wind_strength: 0.0,
            flow_intensity: 1.0,
        }
    }
}

impl VectorFieldSettings {
    /// Reads `bias_enabled`, `bias_angle` (degrees), `bias_strength`,
    /// `polarity`, `falloff`, `wind_strength`, and `flow_intensity`.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            bias: DirectionalBias {
                enabled: param_bool(params, "bias_enabled", d.bias.enabled),
                angle: param_degrees(params, "bias_angle", d.bias.angle),
                strength: param_f64(params, "bias_strength", d.bias.strength),
            },
            polarity: param_parsed(params, "polarity", d.polarity),
            falloff: param_parsed(params, "falloff", d.falloff),
            wind_strength: param_f64(params, "wind_strength", d.wind_strength),
            flow_intensity: param_f64(params, "flow_intensity", d.flow_intensity),
        }
    }
}

/// Per-query state shared by every source term.
#[derive(Debug, Clone, Copy)]
pub struct ContributionContext {
    pub polarity: PolarityMode,
    pub falloff: Falloff,
    pub time: f64,
}

/// A point source that adds a term to the vector field.
pub trait FieldContribution {
    /// This source's term at `(x, y)`; zero when the query is within
    /// [`MIN_DISTANCE`] of the source.
    fn contribution(&self, x: f64, y: f64, ctx: &ContributionContext) -> DVec2;
}

/// Unit vector from the query toward `(sx, sy)` and the distance, or
/// `None` inside the degenerate radius.
fn toward(sx: f64, sy: f64, x: f64, y: f64) -> Option<(DVec2, f64)> {
    let to = DVec2::new(sx - x, sy - y);
    let d = to.length();
    if d <= MIN_DISTANCE {
        return None;
    }
    Some((to / d, d))
}

impl FieldContribution for Pole {
    fn contribution(&self, x: f64, y: f64, ctx: &ContributionContext) -> DVec2 {
        let Some((unit, d)) = toward(self.x, self.y, x, y) else {
            return DVec2::ZERO;
        };
        let radial = || self.strength * FORCE_SCALE * ctx.falloff.weight(d, self.radius);
        match self.kind {
            PoleKind::Polar if ctx.polarity.attracts(self.is_positive) => unit * radial(),
            PoleKind::Polar | PoleKind::Repeller => -unit * radial(),
            PoleKind::Attractor => unit * radial(),
            PoleKind::Vortex => unit.perp() * radial(),
            PoleKind::Quantum => unit * self.quantum_magnitude(d, ctx.time),
        }
    }
}

impl Pole {
    /// Exponential envelope times a travelling sine; replaces the falloff law.
    fn quantum_magnitude(&self, d: f64, time: f64) -> f64 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let envelope = (-d / self.radius).exp();
        let wave = (self.phase + time + d * QUANTUM_WAVENUMBER).sin();
        self.strength * FORCE_SCALE * envelope * wave
    }
}

impl FieldContribution for TurbulenceSource {
    fn contribution(&self, x: f64, y: f64, ctx: &ContributionContext) -> DVec2 {
        let Some((unit, d)) = toward(self.x, self.y, x, y) else {
            return DVec2::ZERO;
        };
        let magnitude = self.strength * FORCE_SCALE * ctx.falloff.weight(d, self.radius);
        let direction = match self.kind {
            TurbulenceKind::Vortex => unit.perp(),
            TurbulenceKind::Source => -unit,
            TurbulenceKind::Sink => unit,
            TurbulenceKind::Uniform => DVec2::from_angle(self.angle),
        };
        direction * magnitude
    }
}

/// Sum of every source term at `(x, y)`, without bias, wind, or intensity.
pub fn superpose<S: FieldContribution>(
    x: f64,
    y: f64,
    sources: &[S],
    ctx: &ContributionContext,
) -> DVec2 {
    sources
        .iter()
        .fold(DVec2::ZERO, |acc, s| acc + s.contribution(x, y, ctx))
}

/// Full vector field at `(x, y)`: bias, source terms, wind, then intensity.
pub fn evaluate_vector_field<S: FieldContribution>(
    x: f64,
    y: f64,
    sources: &[S],
    settings: &VectorFieldSettings,
    time: f64,
) -> VectorSample {
    let ctx = ContributionContext {
        polarity: settings.polarity,
        falloff: settings.falloff,
        time,
    };
    let total = settings.bias.vector()
        + superpose(x, y, sources, &ctx)
        + wind_vector(x, y, time, settings.wind_strength);
    VectorSample::from_vector(total * settings.flow_intensity)
}

/// A configured vector field that can be sampled anywhere.
pub trait VectorField: Send + Sync {
    fn sample(&self, x: f64, y: f64, time: f64) -> VectorSample;
}

/// Source-driven field borrowing its sources and settings.
pub struct SourceField<'a, S> {
    pub sources: &'a [S],
    pub settings: VectorFieldSettings,
}

impl<'a, S> SourceField<'a, S> {
    pub fn new(sources: &'a [S], settings: VectorFieldSettings) -> Self {
        Self { sources, settings }
    }
}

pub type PoleField<'a> = SourceField<'a, Pole>;
pub type TurbulenceField<'a> = SourceField<'a, TurbulenceSource>;

impl<S: FieldContribution + Sync> VectorField for SourceField<'_, S> {
    fn sample(&self, x: f64, y: f64, time: f64) -> VectorSample {
        evaluate_vector_field(x, y, self.sources, &self.settings, time)
    }
}

/// One sample of a regular vector grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridVector {
    pub x: f64,
    pub y: f64,
    pub sample: VectorSample,
}

/// Samples `field` at the centers of `spacing`-sized cells covering `bounds`.
///
/// A non-positive spacing yields no samples.
pub fn sample_vector_grid(
    field: &dyn VectorField,
    bounds: Bounds,
    spacing: f64,
    time: f64,
) -> Vec<GridVector> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Vec::new();
    }
    let cols = (bounds.width / spacing).floor() as usize;
    let rows = (bounds.height / spacing).floor() as usize;
    let mut out = Vec::with_capacity(cols.saturating_mul(rows).min(MAX_RESERVE));
    for row in 0..rows {
        for col in 0..cols {
            let x = spacing * (col as f64 + 0.5);
            let y = spacing * (row as f64 + 0.5);
            out.push(GridVector {
                x,
                y,
                sample: field.sample(x, y, time),
            });
        }
    }
    out
}
