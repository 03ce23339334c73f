//! Fixed-step Euler streamlines through a [`VectorField`].
//!
//! Each step follows the normalized field direction for `step_size` canvas
//! units, so consecutive points are exactly one step apart regardless of
//! field magnitude. Integration stops at the step budget, in a stagnant
//! region, or when the next position would leave the canvas.

use crate::flow::{FlowField, FlowSettings};
use crate::geometry::{Bounds, Point};
use crate::noise::NoiseSynth;
use crate::prng::Xorshift64;
use crate::source::TurbulenceSource;
use crate::vector::{VectorField, MAX_RESERVE};
use glam::DVec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field magnitudes below this end a streamline.
pub const DEFAULT_MIN_MAGNITUDE: f64 = 1e-6;

/// Integration limits for one streamline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamlineConfig {
    /// Maximum number of recorded points.
    pub steps: usize,
    pub step_size: f64,
    pub min_magnitude: f64,
    pub bounds: Bounds,
}

impl StreamlineConfig {
    pub fn new(steps: usize, step_size: f64, bounds: Bounds) -> Self {
        Self {
            steps,
            step_size,
            min_magnitude: DEFAULT_MIN_MAGNITUDE,
            bounds,
        }
    }
}

/// An integrated path through the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streamline {
    pub points: Vec<Point>,
}

/// Integrates one streamline starting at `(seed_x, seed_y)`.
///
/// The seed is always recorded. The position that would leave the bounds
/// is not.
pub fn integrate_streamline(
    seed_x: f64,
    seed_y: f64,
    field: &dyn VectorField,
    time: f64,
    config: &StreamlineConfig,
) -> Streamline {
    let mut points = Vec::with_capacity(config.steps.min(MAX_RESERVE));
    let mut pos = DVec2::new(seed_x, seed_y);

    for _ in 0..config.steps {
        points.push(Point::from(pos));
        let sample = field.sample(pos.x, pos.y, time);
        // Also stops on NaN.
        if !(sample.magnitude >= config.min_magnitude) {
            break;
        }
        let next = pos + sample.vector() / sample.magnitude * config.step_size;
        if !config.bounds.contains(next.x, next.y) {
            break;
        }
        pos = next;
    }

    Streamline { points }
}

/// Streamline through the noise-steered flow field.
#[allow(clippy::too_many_arguments)]
pub fn trace_flow_streamline(
    seed_x: f64,
    seed_y: f64,
    sources: &[TurbulenceSource],
    noise: &NoiseSynth,
    flow: &FlowSettings,
    time: f64,
    steps: usize,
    step_size: f64,
    bounds: Bounds,
) -> Streamline {
    let field = FlowField {
        sources,
        noise,
        settings: *flow,
    };
    integrate_streamline(
        seed_x,
        seed_y,
        &field,
        time,
        &StreamlineConfig::new(steps, step_size, bounds),
    )
}

/// Seed lattice at the centers of `spacing`-sized cells, each displaced by
/// up to `jitter` canvas units per axis and clamped to the bounds.
///
/// Deterministic for a given `seed`. A non-positive spacing yields no seeds.
pub fn seed_points(bounds: Bounds, spacing: f64, jitter: f64, seed: u64) -> Vec<Point> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Vec::new();
    }
    let mut rng = Xorshift64::new(seed);
    let cols = (bounds.width / spacing).floor() as usize;
    let rows = (bounds.height / spacing).floor() as usize;
    let mut seeds = Vec::with_capacity(cols.saturating_mul(rows).min(MAX_RESERVE));
    for row in 0..rows {
        for col in 0..cols {
            let x = spacing * (col as f64 + 0.5) + rng.next_signed() * jitter;
            let y = spacing * (row as f64 + 0.5) + rng.next_signed() * jitter;
            seeds.push(Point::new(
                x.clamp(0.0, bounds.width),
                y.clamp(0.0, bounds.height),
            ));
        }
    }
    seeds
}

/// Integrates every seed, keeping lines with at least two points.
pub fn trace_streamlines(
    field: &dyn VectorField,
    seeds: &[Point],
    time: f64,
    config: &StreamlineConfig,
) -> Vec<Streamline> {
    let lines: Vec<Streamline> = seeds
        .iter()
        .map(|s| integrate_streamline(s.x, s.y, field, time, config))
        .filter(|line| line.points.len() >= 2)
        .collect();
    debug!(
        seeds = seeds.len(),
        streamlines = lines.len(),
        steps = config.steps,
        "streamlines traced"
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseConfig;
    use crate::source::{PointSource, TurbulenceKind};
    use crate::vector::VectorSample;

    fn bounds() -> Bounds {
        Bounds::new(600.0, 400.0).unwrap()
    }

    /// Constant field for isolating the integrator.
    struct Constant(DVec2);

    impl VectorField for Constant {
        fn sample(&self, _x: f64, _y: f64, _time: f64) -> VectorSample {
            VectorSample::from_vector(self.0)
        }
    }

    #[test]
    fn uniform_flow_gives_straight_horizontal_line() {
        let noise = NoiseSynth::new(NoiseConfig::silent());
        let line = trace_flow_streamline(
            10.0,
            200.0,
            &[],
            &noise,
            &FlowSettings::default(),
            0.0,
            50,
            5.0,
            bounds(),
        );
        assert_eq!(line.points.len(), 50);
        for (i, p) in line.points.iter().enumerate() {
            assert_eq!(p.y, 200.0);
            assert!((p.x - (10.0 + 5.0 * i as f64)).abs() < 1e-9);
        }
    }

    #[test]
    fn step_budget_is_an_upper_bound_not_a_reservation() {
        let config = StreamlineConfig::new(usize::MAX, 5.0, bounds());
        let line = integrate_streamline(590.0, 200.0, &Constant(DVec2::X), 0.0, &config);
        assert_eq!(line.points.len(), 3);
    }

    #[test]
    fn stops_before_leaving_bounds() {
        let config = StreamlineConfig::new(50, 5.0, bounds());
        let line = integrate_streamline(590.0, 200.0, &Constant(DVec2::X), 0.0, &config);
        let xs: Vec<f64> = line.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![590.0, 595.0, 600.0]);
    }

    #[test]
    fn stagnant_field_records_only_the_seed() {
        let config = StreamlineConfig::new(50, 5.0, bounds());
        let line = integrate_streamline(100.0, 100.0, &Constant(DVec2::ZERO), 0.0, &config);
        assert_eq!(line.points, vec![Point::new(100.0, 100.0)]);
    }

    #[test]
    fn nan_field_stops_immediately() {
        let config = StreamlineConfig::new(50, 5.0, bounds());
        let line = integrate_streamline(100.0, 100.0, &Constant(DVec2::NAN), 0.0, &config);
        assert_eq!(line.points.len(), 1);
    }

    #[test]
    fn zero_steps_is_empty() {
        let config = StreamlineConfig::new(0, 5.0, bounds());
        let line = integrate_streamline(100.0, 100.0, &Constant(DVec2::X), 0.0, &config);
        assert!(line.points.is_empty());
    }

    #[test]
    fn magnitude_does_not_change_step_length() {
        let config = StreamlineConfig::new(10, 3.0, bounds());
        let slow = integrate_streamline(50.0, 50.0, &Constant(DVec2::new(1e-3, 1e-3)), 0.0, &config);
        let fast = integrate_streamline(50.0, 50.0, &Constant(DVec2::new(40.0, 40.0)), 0.0, &config);
        assert_eq!(slow.points.len(), fast.points.len());
        for (a, b) in slow.points.iter().zip(&fast.points) {
            assert!(a.distance(*b) < 1e-9);
        }
    }

    #[test]
    fn vortex_line_circles_the_source() {
        let noise = NoiseSynth::new(NoiseConfig::silent());
        let flow = FlowSettings {
            enabled: false,
            ..FlowSettings::default()
        };
        let vortex = [TurbulenceSource::create("t".into(), TurbulenceKind::Vortex, 300.0, 200.0)];
        let line = trace_flow_streamline(300.0, 150.0, &vortex, &noise, &flow, 0.0, 200, 1.0, bounds());
        assert_eq!(line.points.len(), 200);
        let center = Point::new(300.0, 200.0);
        for p in &line.points {
            let r = p.distance(center);
            assert!((40.0..60.0).contains(&r), "drifted to radius {r}");
        }
    }

    #[test]
    fn seed_points_are_deterministic_and_in_bounds() {
        let a = seed_points(bounds(), 40.0, 8.0, 7);
        let b = seed_points(bounds(), 40.0, 8.0, 7);
        let c = seed_points(bounds(), 40.0, 8.0, 8);
        assert_eq!(a.len(), 15 * 10);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.iter().all(|p| bounds().contains(p.x, p.y)));
    }

    #[test]
    fn seed_points_without_jitter_sit_on_cell_centers() {
        let seeds = seed_points(bounds(), 100.0, 0.0, 1);
        assert_eq!(seeds[0], Point::new(50.0, 50.0));
        assert_eq!(seeds[7], Point::new(150.0, 150.0));
    }

    #[test]
    fn seed_points_reject_bad_spacing() {
        assert!(seed_points(bounds(), 0.0, 1.0, 1).is_empty());
        assert!(seed_points(bounds(), f64::NAN, 1.0, 1).is_empty());
    }

    #[test]
    fn trace_streamlines_drops_single_point_lines() {
        let seeds = [Point::new(100.0, 100.0), Point::new(600.0, 100.0)];
        let config = StreamlineConfig::new(20, 5.0, bounds());
        let lines = trace_streamlines(&Constant(DVec2::X), &seeds, 0.0, &config);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points[0], Point::new(100.0, 100.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn consecutive_points_are_one_step_apart(
                seed_x in 0.0_f64..600.0,
                seed_y in 0.0_f64..400.0,
                step_size in 0.5_f64..10.0,
                steps in 1_usize..100,
                tx in -100.0_f64..700.0,
                ty in -100.0_f64..500.0,
            ) {
                let noise = NoiseSynth::new(NoiseConfig::default());
                let sources = [TurbulenceSource::create("t".into(), TurbulenceKind::Sink, tx, ty)];
                let line = trace_flow_streamline(
                    seed_x, seed_y, &sources, &noise, &FlowSettings::default(),
                    0.0, steps, step_size, bounds(),
                );
                prop_assert!(!line.points.is_empty());
                prop_assert!(line.points.len() <= steps);
                for w in line.points.windows(2) {
                    let d = w[0].distance(w[1]);
                    prop_assert!((d - step_size).abs() < 1e-9, "step {d} vs {step_size}");
                }
                for p in &line.points[1..] {
                    prop_assert!(bounds().contains(p.x, p.y));
                }
            }
        }
    }
}
