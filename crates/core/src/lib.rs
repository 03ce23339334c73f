#![deny(unsafe_code)]
//! Core field engine for the field-studio visualizations.
//!
//! Provides point sources and their registry, the noise synthesizer, the
//! scalar (terrain) and vector (pole, turbulence, flow) evaluators, the
//! marching-squares contour extractor, the streamline integrator, the
//! animation clock, and the `Scene` trait that ties them to a `Frame`.
//! Every evaluator is a pure function of position, sources, settings, and
//! time.

pub mod clock;
pub mod contour;
pub mod error;
pub mod flow;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod noise;
pub mod params;
pub mod prng;
pub mod scalar;
pub mod scene;
pub mod settings;
pub mod source;
pub mod streamline;
pub mod vector;

pub use clock::AnimationClock;
pub use contour::{extract_contours, extract_level, ContourLine, ContourSettings, EXCLUSION_RADIUS};
pub use error::FieldError;
pub use flow::{evaluate_flow_field, FlowField, FlowSettings};
pub use frame::Frame;
pub use geometry::{Bounds, Point};
pub use grid::SampleGrid;
pub use noise::{synthesize_noise, NoiseConfig, NoiseSynth};
pub use prng::Xorshift64;
pub use scalar::{evaluate_scalar_field, TerrainSettings};
pub use scene::Scene;
pub use settings::{Animated, AnimationSettings, VisualizationSettings};
pub use source::{
    ElevationKind, ElevationPoint, PointSource, Pole, PoleKind, SourceRegistry, TurbulenceKind,
    TurbulenceSource,
};
pub use streamline::{integrate_streamline, trace_flow_streamline, Streamline, StreamlineConfig};
pub use vector::{evaluate_vector_field, GridVector, VectorField, VectorFieldSettings, VectorSample};

#[cfg(test)]
mod tests {
    //! End-to-end scenarios across evaluators.

    use super::*;
    use std::collections::BTreeSet;

    fn pole(id: &str, kind: PoleKind, x: f64, y: f64) -> Pole {
        Pole::create(id.into(), kind, x, y)
    }

    #[test]
    fn attractor_pulls_sample_toward_itself() {
        let sources = [pole("pole-1", PoleKind::Attractor, 200.0, 300.0)];
        let s = evaluate_vector_field(300.0, 300.0, &sources, &VectorFieldSettings::default(), 0.0);
        assert!(s.field_x < 0.0);
        assert!(s.field_y.abs() < 1e-12);
    }

    #[test]
    fn single_peak_gives_banded_contours_clear_of_the_peak() {
        let mut registry = SourceRegistry::<ElevationPoint>::new();
        let id = registry.add(ElevationKind::Peak, 300.0, 200.0);
        registry
            .update(
                &id,
                source::ElevationPatch {
                    elevation: Some(800.0),
                    radius: Some(150.0),
                    ..Default::default()
                },
            )
            .unwrap();
        let terrain = TerrainSettings {
            min_elevation: 0.0,
            max_elevation: 1000.0,
            ..TerrainSettings::default()
        };
        let contour = ContourSettings {
            contour_interval: 50.0,
            ..ContourSettings::default()
        };
        let lines = extract_contours(
            registry.list(),
            &terrain,
            &contour,
            &NoiseSynth::new(NoiseConfig::default()),
            Bounds::new(600.0, 400.0).unwrap(),
            0.0,
        );

        assert!(lines.len() > 10, "only {} fragments", lines.len());
        let levels: BTreeSet<u64> = lines.iter().map(|l| l.elevation as u64).collect();
        assert!(levels.len() >= 5, "levels: {levels:?}");
        for level in &levels {
            assert_eq!(level % 50, 0);
            assert!((50..=800).contains(level), "unexpected level {level}");
        }
        let peak = Point::new(300.0, 200.0);
        for line in &lines {
            assert!(!line.closed);
            for p in &line.points {
                assert!(p.distance(peak) >= EXCLUSION_RADIUS);
            }
        }
    }

    #[test]
    fn opposite_poles_pull_midpoint_toward_the_positive_pole() {
        let positive = pole("pole-1", PoleKind::Polar, 300.0, 200.0);
        let negative = Pole {
            is_positive: false,
            ..pole("pole-2", PoleKind::Polar, 500.0, 200.0)
        };
        let s = evaluate_vector_field(
            400.0,
            200.0,
            &[positive, negative],
            &VectorFieldSettings::default(),
            0.0,
        );
        assert!(s.field_y.abs() < 1e-12);
        // Both terms point toward x = 300: pulled by one, pushed by the other.
        let single = 100.0 * vector::FORCE_SCALE / (100.0 * vector::DISTANCE_SOFTENING + 1.0);
        assert!((s.field_x + 2.0 * single).abs() < 1e-12, "field_x = {}", s.field_x);
    }

    #[test]
    fn uniform_flow_streamline_is_straight() {
        let noise = NoiseSynth::new(NoiseConfig::silent());
        let line = trace_flow_streamline(
            100.0,
            50.0,
            &[],
            &noise,
            &FlowSettings::default(),
            0.0,
            40,
            2.5,
            Bounds::new(600.0, 400.0).unwrap(),
        );
        assert_eq!(line.points.len(), 40);
        for pair in line.points.windows(2) {
            assert_eq!(pair[0].y, 50.0);
            assert!((pair[1].x - pair[0].x - 2.5).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_sources_without_noise_is_flat_zero() {
        let terrain = TerrainSettings::default();
        let noise = NoiseSynth::new(NoiseConfig::silent());
        for i in 0..20 {
            for j in 0..20 {
                let (x, y) = (i as f64 * 31.0, j as f64 * 19.0);
                assert_eq!(evaluate_scalar_field(x, y, &[], &terrain, &noise, 3.0), 0.0);
            }
        }
    }
}
