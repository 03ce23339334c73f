//! The `Scene` trait that every visualization implements.
//!
//! A scene bundles an [`AnimationClock`], a source registry, and one
//! [`VisualizationSettings`] variant, and turns them into a [`Frame`] on
//! demand. The trait is object-safe so scenes can be switched at runtime
//! as `dyn Scene`.

use crate::clock::AnimationClock;
use crate::error::FieldError;
use crate::frame::Frame;
use crate::geometry::Bounds;
use crate::params::param_usize;
use crate::prng::Xorshift64;
use crate::settings::VisualizationSettings;
use crate::source::{PointSource, SourceRegistry};
use serde_json::Value;
use tracing::debug;

/// Number of default sources placed when params carry no `sources` list.
pub const DEFAULT_SOURCE_COUNT: usize = 3;
/// Fraction of each canvas side kept free of default sources.
pub const SOURCE_MARGIN: f64 = 0.1;

/// Core trait for visualizations.
///
/// Frames are pure functions of the clock time, sources, and settings:
/// querying [`frame`](Scene::frame) twice without stepping gives equal output.
pub trait Scene {
    /// Advance the animation clock by `delta` (seconds of wall time).
    fn step(&mut self, delta: f64);

    /// Output geometry at the current clock time.
    fn frame(&self) -> Frame;

    fn clock(&self) -> &AnimationClock;

    fn clock_mut(&mut self) -> &mut AnimationClock;

    fn settings(&self) -> VisualizationSettings;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;

    /// Rewind the clock to time 0.
    fn reset(&mut self) {
        self.clock_mut().reset();
    }
}

/// Canvas bounds for integer scene dimensions.
pub fn scene_bounds(width: usize, height: usize) -> Result<Bounds, FieldError> {
    Bounds::new(width as f64, height as f64)
}

/// Builds the source registry of a scene from its params.
///
/// A `"sources"` array is decoded as full records. Otherwise
/// `source_count` sources (default [`DEFAULT_SOURCE_COUNT`]) are placed
/// from `seed`, cycling through `kinds` and keeping [`SOURCE_MARGIN`] of
/// each side clear.
pub fn sources_from_params<S: PointSource>(
    params: &Value,
    bounds: Bounds,
    seed: u64,
    kinds: &[S::Kind],
) -> Result<SourceRegistry<S>, FieldError> {
    if let Some(list) = params.get("sources") {
        let sources: Vec<S> = serde_json::from_value(list.clone())
            .map_err(|e| FieldError::InvalidSources(e.to_string()))?;
        debug!(count = sources.len(), "sources decoded from params");
        return Ok(SourceRegistry::from_sources(sources));
    }

    let count = param_usize(params, "source_count", DEFAULT_SOURCE_COUNT);
    let mut registry = SourceRegistry::new();
    if kinds.is_empty() {
        return Ok(registry);
    }
    let mut rng = Xorshift64::new(seed);
    let (mx, my) = (bounds.width * SOURCE_MARGIN, bounds.height * SOURCE_MARGIN);
    for i in 0..count {
        let x = rng.next_range(mx, bounds.width - mx);
        let y = rng.next_range(my, bounds.height - my);
        registry.add(kinds[i % kinds.len()], x, y);
    }
    debug!(count, seed, "default sources placed");
    Ok(registry)
}
