//! Iso-contour extraction by marching squares with exclusion clipping.
//!
//! The terrain is sampled once on a regular grid, then every level is
//! traced cell by cell. Geometry within [`EXCLUSION_RADIUS`] of an
//! elevation point is suppressed so point markers stay uncluttered:
//! cells centered inside a disk are skipped, crossings inside a disk are
//! dropped, and segments passing through a disk are discarded.
//!
//! Crossings in a cell are paired in edge order (top, right, bottom,
//! left), so the saddle case is not disambiguated. Each accepted pair is
//! emitted as its own two-point line; fragments are never stitched.

use crate::geometry::{distance_to_segment, Bounds, Point};
use crate::grid::SampleGrid;
use crate::noise::NoiseSynth;
use crate::params::param_f64;
use crate::scalar::{evaluate_scalar_field, TerrainSettings};
use crate::source::ElevationPoint;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Radius of the disk around each elevation point that contours avoid.
pub const EXCLUSION_RADIUS: f64 = 20.0;

/// Grid step at resolution 1.
const BASE_STEP: f64 = 20.0;
const MIN_STEP: f64 = 2.0;

/// One contour fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLine {
    pub elevation: f64,
    pub points: Vec<Point>,
    pub closed: bool,
}

/// Contour sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourSettings {
    /// Elevation spacing between levels.
    pub contour_interval: f64,
    /// Higher values sample a finer grid.
    pub resolution: f64,
}

impl Default for ContourSettings {
    fn default() -> Self {
        Self {
            contour_interval: 50.0,
            resolution: 1.0,
        }
    }
}

impl ContourSettings {
    pub fn from_json(params: &Value) -> Self {
        let d = Self::default();
        Self {
            contour_interval: param_f64(params, "contour_interval", d.contour_interval),
            resolution: param_f64(params, "resolution", d.resolution),
        }
    }

    /// `max(2, floor(20 / resolution))`, or `None` for a non-positive resolution.
    pub fn grid_step(&self) -> Option<f64> {
        if !(self.resolution > 0.0) {
            return None;
        }
        Some((BASE_STEP / self.resolution).floor().max(MIN_STEP))
    }
}

/// Levels `min + k·interval` for `k = 1, 2, ...` strictly below `max`.
///
/// A non-positive or non-finite interval yields no levels.
pub fn contour_levels(min: f64, max: f64, interval: f64) -> Vec<f64> {
    if !(interval > 0.0) || !interval.is_finite() || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    (1..)
        .map(|k| min + k as f64 * interval)
        .take_while(|&level| level < max)
        .collect()
}

fn inside_exclusion(p: DVec2, sources: &[ElevationPoint]) -> bool {
    sources
        .iter()
        .any(|s| p.distance(DVec2::new(s.x, s.y)) < EXCLUSION_RADIUS)
}

fn segment_clear(a: DVec2, b: DVec2, sources: &[ElevationPoint]) -> bool {
    sources
        .iter()
        .all(|s| distance_to_segment(DVec2::new(s.x, s.y), a, b) >= EXCLUSION_RADIUS)
}

/// Linear crossing of `level` along the edge `a`-`b`, if the corner values straddle it.
fn edge_crossing(a: DVec2, va: f64, b: DVec2, vb: f64, level: f64) -> Option<DVec2> {
    if (va < level) == (vb < level) {
        return None;
    }
    let t = (level - va) / (vb - va);
    Some(a + (b - a) * t)
}

/// Contour fragments at one `level` of an already sampled grid.
pub fn extract_level(grid: &SampleGrid, sources: &[ElevationPoint], level: f64) -> Vec<ContourLine> {
    let step = grid.step();
    let mut lines = Vec::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let (x, y) = grid.position(col, row);
            let center = DVec2::new(x + step / 2.0, y + step / 2.0);
            if inside_exclusion(center, sources) {
                continue;
            }

            let p00 = DVec2::new(x, y);
            let p10 = DVec2::new(x + step, y);
            let p11 = DVec2::new(x + step, y + step);
            let p01 = DVec2::new(x, y + step);
            let v00 = grid.get(col, row);
            let v10 = grid.get(col + 1, row);
            let v11 = grid.get(col + 1, row + 1);
            let v01 = grid.get(col, row + 1);

            let edges = [
                (p00, v00, p10, v10),
                (p10, v10, p11, v11),
                (p01, v01, p11, v11),
                (p00, v00, p01, v01),
            ];
            let crossings: Vec<DVec2> = edges
                .iter()
                .filter_map(|&(a, va, b, vb)| edge_crossing(a, va, b, vb, level))
                .filter(|&p| !inside_exclusion(p, sources))
                .collect();

            for pair in crossings.chunks_exact(2) {
                let (a, b) = (pair[0], pair[1]);
                if segment_clear(a, b, sources) {
                    lines.push(ContourLine {
                        elevation: level,
                        points: vec![a.into(), b.into()],
                        closed: false,
                    });
                }
            }
        }
    }

    lines
}

/// Contour fragments for every level of the terrain range.
///
/// Samples the scalar field once and reuses the grid across levels.
/// A non-positive resolution or interval yields no lines.
pub fn extract_contours(
    sources: &[ElevationPoint],
    terrain: &TerrainSettings,
    contour: &ContourSettings,
    noise: &NoiseSynth,
    bounds: Bounds,
    time: f64,
) -> Vec<ContourLine> {
    let levels = contour_levels(
        terrain.min_elevation,
        terrain.max_elevation,
        contour.contour_interval,
    );
    let Some(step) = contour.grid_step() else {
        warn!(resolution = contour.resolution, "non-positive contour resolution");
        return Vec::new();
    };
    if levels.is_empty() {
        return Vec::new();
    }

    let sampled = SampleGrid::sample(bounds, step, |x, y| {
        evaluate_scalar_field(x, y, sources, terrain, noise, time)
    });
    let grid = match sampled {
        Ok(grid) => grid,
        Err(e) => {
            warn!(error = %e, step, "contour grid could not be sampled");
            return Vec::new();
        }
    };

    let lines: Vec<ContourLine> = levels
        .iter()
        .flat_map(|&level| extract_level(&grid, sources, level))
        .collect();
    debug!(
        levels = levels.len(),
        fragments = lines.len(),
        step,
        cells = grid.cols() * grid.rows(),
        "contours extracted"
    );
    lines
}
