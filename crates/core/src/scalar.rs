//! Terrain elevation from weighted elevation points plus micro-noise.
//!
//! Each elevation point contributes its elevation with an inverse-square
//! weight, boosted near the point by a kind-specific exponential term.
//! The result is a weighted average, pulled toward a faint ambient base
//! level far from every point, with a small noise term on top.

use crate::noise::NoiseSynth;
use crate::params::param_f64;
use crate::source::{ElevationKind, ElevationPoint};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Distance below which a query is treated as sitting on the source.
pub const DEGENERATE_DISTANCE: f64 = 1.0;

/// Terrain evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSettings {
    pub min_elevation: f64,
    pub max_elevation: f64,
    /// Elevation the terrain relaxes to far from every point.
    pub base_elevation: f64,
    /// Weight of the base level in the average; 0 disables it.
    pub ambient_weight: f64,
    /// Multiplier on the noise octave sum.
    pub noise_amplitude: f64,
    /// Canvas units per time unit the noise pattern slides along x.
    pub noise_drift: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            min_elevation: 0.0,
            max_elevation: 1000.0,
            base_elevation: 0.0,
            ambient_weight: 2.5e-5,
            noise_amplitude: 10.0,
            noise_drift: 0.0,
        }
    }
}

impl TerrainSettings {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            min_elevation: param_f64(params, "min_elevation", d.min_elevation),
            max_elevation: param_f64(params, "max_elevation", d.max_elevation),
            base_elevation: param_f64(params, "base_elevation", d.base_elevation),
            ambient_weight: param_f64(params, "ambient_weight", d.ambient_weight),
            noise_amplitude: param_f64(params, "noise_amplitude", d.noise_amplitude),
            noise_drift: param_f64(params, "noise_drift", d.noise_drift),
        }
    }
}

/// Near-field boost of a source, as a factor on its `1/d²` weight.
///
/// `falloff` is `exp(-d / radius)`; `bearing` is the angle from the source
/// to the query point.
fn kind_multiplier(kind: ElevationKind, falloff: f64, bearing: f64) -> f64 {
    match kind {
        ElevationKind::Peak => 1.0 + 2.0 * falloff,
        ElevationKind::Valley => 1.0 + 1.5 * falloff,
        // |cos 2θ| stretches the influence along two perpendicular axes.
        ElevationKind::Ridge => 1.0 + falloff * (2.0 * bearing).cos().abs(),
        ElevationKind::Saddle => 1.0 + 0.8 * falloff,
    }
}

/// Elevation at `(x, y)`.
///
/// A query closer than [`DEGENERATE_DISTANCE`] to a source returns that
/// source's elevation unchanged. Otherwise the weighted average plus
/// noise is clamped to `[min_elevation, max_elevation]`. With no sources
/// and no ambient weight the average term is 0.
pub fn evaluate_scalar_field(
    x: f64,
    y: f64,
    sources: &[ElevationPoint],
    terrain: &TerrainSettings,
    noise: &NoiseSynth,
    time: f64,
) -> f64 {
    let mut weighted = terrain.ambient_weight * terrain.base_elevation;
    let mut total_weight = terrain.ambient_weight;

    for source in sources {
        let dx = x - source.x;
        let dy = y - source.y;
        let d = dx.hypot(dy);
        if d < DEGENERATE_DISTANCE {
            return source.elevation;
        }
        let falloff = (-d / source.radius).exp();
        let bearing = dy.atan2(dx);
        let w = kind_multiplier(source.kind, falloff, bearing) / (d * d);
        weighted += w * source.elevation;
        total_weight += w;
    }

    let base = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        0.0
    };
    let micro = terrain.noise_amplitude * noise.sample(x + time * terrain.noise_drift, y);

    // Not `f64::clamp`: an inverted range must not panic.
    (base + micro).max(terrain.min_elevation).min(terrain.max_elevation)
}
