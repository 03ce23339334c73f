//! Per-visualization settings records and their tagged union.
//!
//! Each scene owns one variant. Settings are plain data: the clock holds
//! time, the registry holds sources.

use crate::contour::ContourSettings;
use crate::flow::FlowSettings;
use crate::noise::NoiseConfig;
use crate::params::{param_bool, param_f64, param_usize};
use crate::scalar::TerrainSettings;
use crate::vector::VectorFieldSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_GRID_SPACING: f64 = 25.0;
const DEFAULT_TURBULENCE_WIND: f64 = 1.0;

/// Playback state shared by every visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    pub is_animating: bool,
    /// Clock speed multiplier.
    pub speed: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            is_animating: true,
            speed: 1.0,
        }
    }
}

impl AnimationSettings {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            is_animating: param_bool(params, "animate", d.is_animating),
            speed: param_f64(params, "speed", d.speed),
        }
    }
}

/// Visualizations whose playback can be toggled.
pub trait Animated {
    fn animation(&self) -> &AnimationSettings;
}

/// Seed lattice and step budget for streamline views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamlineSettings {
    pub steps: usize,
    pub step_size: f64,
    /// Distance between lattice seeds.
    pub spacing: f64,
    /// Maximum seed displacement per axis.
    pub jitter: f64,
}

impl Default for StreamlineSettings {
    fn default() -> Self {
        Self {
            steps: 100,
            step_size: 2.0,
            spacing: 30.0,
            jitter: 5.0,
        }
    }
}

impl StreamlineSettings {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            steps: param_usize(params, "streamline_steps", d.steps),
            step_size: param_f64(params, "step_size", d.step_size),
            spacing: param_f64(params, "seed_spacing", d.spacing),
            jitter: param_f64(params, "seed_jitter", d.jitter),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TopographySettings {
    pub terrain: TerrainSettings,
    pub contour: ContourSettings,
    pub noise: NoiseConfig,
    pub animation: AnimationSettings,
}

impl TopographySettings {
    pub fn from_json(params: &Value) -> Self {
        Self {
            terrain: TerrainSettings::from_json(params),
            contour: ContourSettings::from_json(params),
            noise: NoiseConfig::from_json(params),
            animation: AnimationSettings::from_json(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultipoleSettings {
    pub field: VectorFieldSettings,
    /// Spacing of the sampled vector grid.
    pub grid_spacing: f64,
    /// Also trace streamlines through the pole field.
    pub field_lines: bool,
    pub streamlines: StreamlineSettings,
    pub animation: AnimationSettings,
}

impl Default for MultipoleSettings {
    fn default() -> Self {
        Self {
            field: VectorFieldSettings::default(),
            grid_spacing: DEFAULT_GRID_SPACING,
            field_lines: false,
            streamlines: StreamlineSettings::default(),
            animation: AnimationSettings::default(),
        }
    }
}

impl MultipoleSettings {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            field: VectorFieldSettings::from_json(params),
            grid_spacing: param_f64(params, "grid_spacing", d.grid_spacing),
            field_lines: param_bool(params, "field_lines", d.field_lines),
            streamlines: StreamlineSettings::from_json(params),
            animation: AnimationSettings::from_json(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowFieldSettings {
    pub flow: FlowSettings,
    pub noise: NoiseConfig,
    pub streamlines: StreamlineSettings,
    pub animation: AnimationSettings,
}

impl FlowFieldSettings {
    pub fn from_json(params: &Value) -> Self {
        Self {
            flow: FlowSettings::from_json(params),
            noise: NoiseConfig::from_json(params),
            streamlines: StreamlineSettings::from_json(params),
            animation: AnimationSettings::from_json(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurbulenceSettings {
    pub field: VectorFieldSettings,
    pub grid_spacing: f64,
    pub animation: AnimationSettings,
}

impl Default for TurbulenceSettings {
    fn default() -> Self {
        Self {
            field: VectorFieldSettings {
                wind_strength: DEFAULT_TURBULENCE_WIND,
                ..VectorFieldSettings::default()
            },
            grid_spacing: DEFAULT_GRID_SPACING,
            animation: AnimationSettings::default(),
        }
    }
}

impl TurbulenceSettings {
    /// Like [`VectorFieldSettings::from_json`], but wind defaults to on.
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            field: VectorFieldSettings {
                wind_strength: param_f64(params, "wind_strength", d.field.wind_strength),
                ..VectorFieldSettings::from_json(params)
            },
            grid_spacing: param_f64(params, "grid_spacing", d.grid_spacing),
            animation: AnimationSettings::from_json(params),
        }
    }
}

/// Settings of any visualization, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum VisualizationSettings {
    Topography(TopographySettings),
    Multipole(MultipoleSettings),
    FlowField(FlowFieldSettings),
    Turbulence(TurbulenceSettings),
}

impl Animated for TopographySettings {
    fn animation(&self) -> &AnimationSettings {
        &self.animation
    }
}

impl Animated for MultipoleSettings {
    fn animation(&self) -> &AnimationSettings {
        &self.animation
    }
}

impl Animated for FlowFieldSettings {
    fn animation(&self) -> &AnimationSettings {
        &self.animation
    }
}

impl Animated for TurbulenceSettings {
    fn animation(&self) -> &AnimationSettings {
        &self.animation
    }
}

impl Animated for VisualizationSettings {
    fn animation(&self) -> &AnimationSettings {
        match self {
            VisualizationSettings::Topography(s) => s.animation(),
            VisualizationSettings::Multipole(s) => s.animation(),
            VisualizationSettings::FlowField(s) => s.animation(),
            VisualizationSettings::Turbulence(s) => s.animation(),
        }
    }
}
