//! Multi-octave pseudo-noise for organic perturbation of the fields.
//!
//! The default basis is a fixed trigonometric product rather than gradient
//! noise: cheap, smooth, and bit-for-bit reproducible. A Perlin basis from
//! the `noise` crate is available for flow fields that want less regular
//! structure.

use crate::params::{param_f64, param_parsed, param_usize};
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Base function summed across octaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseBasis {
    /// `sin(u) * cos(v) * sin(1.7u + 1.3v)`.
    #[default]
    Trig,
    /// 2D Perlin gradient noise seeded with [`NoiseConfig::seed`].
    Perlin,
}

impl FromStr for NoiseBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trig" => Ok(NoiseBasis::Trig),
            "perlin" => Ok(NoiseBasis::Perlin),
            other => Err(format!("unknown noise basis: {other}")),
        }
    }
}

impl fmt::Display for NoiseBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoiseBasis::Trig => "trig",
            NoiseBasis::Perlin => "perlin",
        })
    }
}

const DEFAULT_SCALE: f64 = 0.01;
const DEFAULT_OCTAVES: usize = 1;
const DEFAULT_PERSISTENCE: f64 = 0.5;
const DEFAULT_LACUNARITY: f64 = 2.0;

/// Octave-sum parameters; fixed for the lifetime of a visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Frequency of the first octave.
    pub scale: f64,
    pub octaves: usize,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    pub seed: u32,
    #[serde(default)]
    pub basis: NoiseBasis,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
            seed: 0,
            basis: NoiseBasis::Trig,
        }
    }
}

impl NoiseConfig {
    /// Reads `noise_scale`, `noise_octaves`, `noise_persistence`,
    /// `noise_lacunarity`, `noise_seed`, and `noise_basis`.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            scale: param_f64(params, "noise_scale", d.scale),
            octaves: param_usize(params, "noise_octaves", d.octaves),
            persistence: param_f64(params, "noise_persistence", d.persistence),
            lacunarity: param_f64(params, "noise_lacunarity", d.lacunarity),
            seed: u32::try_from(param_usize(params, "noise_seed", d.seed as usize))
                .unwrap_or(d.seed),
            basis: param_parsed(params, "noise_basis", d.basis),
        }
    }

    /// Configuration that always yields 0.
    pub fn silent() -> Self {
        Self {
            octaves: 0,
            ..Self::default()
        }
    }
}

/// A [`NoiseConfig`] with its basis function built once for repeated sampling.
#[derive(Debug, Clone)]
pub struct NoiseSynth {
    config: NoiseConfig,
    perlin: Option<Perlin>,
}

impl NoiseSynth {
    pub fn new(config: NoiseConfig) -> Self {
        let perlin = match config.basis {
            NoiseBasis::Trig => None,
            NoiseBasis::Perlin => Some(Perlin::new(config.seed)),
        };
        Self { config, perlin }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Octave sum at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let c = &self.config;
        let offset = f64::from(c.seed);
        let (total, _, _) =
            (0..c.octaves).fold((0.0, 1.0, c.scale), |(total, amplitude, frequency), _| {
                let u = x * frequency + offset;
                let v = y * frequency + offset;
                (
                    total + amplitude * self.basis(u, v),
                    amplitude * c.persistence,
                    frequency * c.lacunarity,
                )
            });
        total
    }

    fn basis(&self, u: f64, v: f64) -> f64 {
        match &self.perlin {
            Some(perlin) => perlin.get([u, v]),
            None => trig_noise(u, v),
        }
    }
}

/// The stylized basis: a product of three phase-shifted waves.
pub fn trig_noise(u: f64, v: f64) -> f64 {
    u.sin() * v.cos() * (u * 1.7 + v * 1.3).sin()
}

/// Samples the octave sum at `(x, y)`. Zero octaves yield exactly 0.
///
/// Builds the basis on every call; hot loops should hold a [`NoiseSynth`].
pub fn synthesize_noise(x: f64, y: f64, config: &NoiseConfig) -> f64 {
    NoiseSynth::new(*config).sample(x, y)
}
