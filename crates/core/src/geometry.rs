//! Plane geometry shared by the evaluators: points, canvas bounds, and the
//! point-to-segment distance used by contour clipping.
//!
//! Arithmetic goes through `glam::DVec2`; [`Point`] is the serialized form
//! handed to the presentation layer as `{ "x": .., "y": .. }`.

use crate::error::FieldError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        DVec2::from(self).distance(DVec2::from(other))
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point { x: v.x, y: v.y }
    }
}

/// The canvas rectangle `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Returns `FieldError::InvalidDimensions` unless both sides are finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, FieldError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(FieldError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    /// Inclusive containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
///
/// A zero-length segment degrades to the point distance.
pub fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
