//! Regular lattice of sampled scalar values.
//!
//! A `SampleGrid` holds `(cols + 1) * (rows + 1)` grid-point values in
//! row-major order, spaced `step` canvas units apart. Unlike a simulation
//! field it is neither clamped nor wrapped: the contour extractor reads the
//! four corners of each cell directly.

use crate::error::FieldError;
use crate::geometry::Bounds;

/// Sampled values on the grid points of a `cols x rows` cell lattice.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    cols: usize,
    rows: usize,
    step: f64,
    data: Vec<f64>,
}

impl SampleGrid {
    /// Samples `f(x, y)` at every grid point covering `bounds` with the given step.
    ///
    /// `cols = ceil(width / step)` and `rows = ceil(height / step)`, so the
    /// last row/column of grid points may sit slightly past the canvas edge.
    /// Returns `FieldError::InvalidDimensions` for a non-positive step.
    pub fn sample<F>(bounds: Bounds, step: f64, mut f: F) -> Result<Self, FieldError>
    where
        F: FnMut(f64, f64) -> f64,
    {
        if !step.is_finite() || step <= 0.0 {
            return Err(FieldError::InvalidDimensions);
        }
        let cols = ((bounds.width / step).ceil() as usize).max(1);
        let rows = ((bounds.height / step).ceil() as usize).max(1);
        let len = (cols + 1)
            .checked_mul(rows + 1)
            .ok_or(FieldError::InvalidDimensions)?;
        let mut data = Vec::with_capacity(len);
        for row in 0..=rows {
            for col in 0..=cols {
                data.push(f(col as f64 * step, row as f64 * step));
            }
        }
        Ok(Self {
            cols,
            rows,
            step,
            data,
        })
    }

    /// Number of cells along x.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells along y.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Spacing between grid points in canvas units.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at grid point `(col, row)`, both in `0..=cols` / `0..=rows`.
    ///
    /// # Panics
    ///
    /// Panics if the grid point is out of range.
    pub fn get(&self, col: usize, row: usize) -> f64 {
        assert!(col <= self.cols && row <= self.rows, "grid point out of range");
        self.data[row * (self.cols + 1) + col]
    }

    /// Canvas position of grid point `(col, row)`.
    pub fn position(&self, col: usize, row: usize) -> (f64, f64) {
        (col as f64 * self.step, row as f64 * self.step)
    }

    /// Smallest and largest sampled value, or `None` for an all-NaN grid.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(w: f64, h: f64) -> Bounds {
        Bounds::new(w, h).unwrap()
    }

    #[test]
    fn sample_covers_bounds_with_ceil_cells() {
        let grid = SampleGrid::sample(bounds(95.0, 40.0), 10.0, |_, _| 0.0).unwrap();
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.rows(), 4);
        assert_eq!(grid.data().len(), 11 * 5);
    }

    #[test]
    fn sample_rejects_non_positive_step() {
        assert!(SampleGrid::sample(bounds(10.0, 10.0), 0.0, |_, _| 0.0).is_err());
        assert!(SampleGrid::sample(bounds(10.0, 10.0), -2.0, |_, _| 0.0).is_err());
        assert!(SampleGrid::sample(bounds(10.0, 10.0), f64::NAN, |_, _| 0.0).is_err());
    }

    #[test]
    fn get_returns_value_sampled_at_position() {
        let grid = SampleGrid::sample(bounds(30.0, 20.0), 10.0, |x, y| x * 100.0 + y).unwrap();
        assert_eq!(grid.get(2, 1), 210.0);
        assert_eq!(grid.position(2, 1), (20.0, 10.0));
        assert_eq!(grid.get(3, 2), 320.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn get_panics_past_last_grid_point() {
        let grid = SampleGrid::sample(bounds(10.0, 10.0), 5.0, |_, _| 0.0).unwrap();
        grid.get(3, 0);
    }

    #[test]
    fn range_reports_extremes() {
        let grid = SampleGrid::sample(bounds(20.0, 20.0), 10.0, |x, y| x - y).unwrap();
        assert_eq!(grid.range(), Some((-20.0, 20.0)));
    }
}
