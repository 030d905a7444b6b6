//! Flat-storage 2D scalar fields.
//!
//! All model quantities (velocities, surface elevation, wind stress,
//! bathymetry) are `(nx, ny)` arrays of `f64` stored row-major in a single
//! `Vec`. Layout: `data[i * ny + j]` for x-index `i`, y-index `j`.

use std::ops::{Index, IndexMut};

use crate::error::ModelError;
use crate::grid::GridSpec;

/// A dense 2D field of `f64` values with shape `(nx, ny)`.
///
/// # Example
///
/// ```
/// use swe2d::Field2D;
///
/// let mut f = Field2D::zeros(4, 3);
/// f[(2, 1)] = 1.5;
/// assert_eq!(f[(2, 1)], 1.5);
/// assert_eq!(f.shape(), (4, 3));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Field2D {
    data: Vec<f64>,
    nx: usize,
    ny: usize,
}

impl Field2D {
    /// Create a field filled with zeros.
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self::filled(nx, ny, 0.0)
    }

    /// Create a field filled with a constant value.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            data: vec![value; nx * ny],
            nx,
            ny,
        }
    }

    /// Build a field by evaluating `f(x, y)` at every grid point.
    ///
    /// The closure receives physical coordinates from the grid axes and is
    /// called exactly once per point.
    pub fn from_fn<F>(grid: &GridSpec, mut f: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        let (nx, ny) = (grid.nx(), grid.ny());
        let mut data = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            let x = grid.x(i);
            for j in 0..ny {
                data.push(f(x, grid.y(j)));
            }
        }
        Self { data, nx, ny }
    }

    /// Field shape as `(nx, ny)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Number of points in the x-direction.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of points in the y-direction.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Raw flat storage, row-major with y fastest.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat storage.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Fill every point with `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Spatial mean over the full grid.
    ///
    /// The field must be non-empty.
    pub fn mean(&self) -> f64 {
        debug_assert!(!self.data.is_empty(), "mean of an empty field");
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Maximum value over the full grid.
    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Maximum absolute value over the full grid.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0f64, |acc, v| acc.max(v.abs()))
    }

    /// Find the first non-finite value, returning its `(i, j)` coordinates.
    pub fn find_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|flat| (flat / self.ny, flat % self.ny))
    }

    /// Check that this field matches the grid shape.
    ///
    /// Returns [`ModelError::ShapeMismatch`] naming the field otherwise.
    pub fn check_shape(&self, name: &'static str, grid: &GridSpec) -> Result<(), ModelError> {
        if self.nx == grid.nx() && self.ny == grid.ny() {
            Ok(())
        } else {
            Err(ModelError::ShapeMismatch {
                name,
                nx: grid.nx(),
                ny: grid.ny(),
                actual_nx: self.nx,
                actual_ny: self.ny,
            })
        }
    }
}

impl Index<(usize, usize)> for Field2D {
    type Output = f64;

    #[inline(always)]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.ny + j]
    }
}

impl IndexMut<(usize, usize)> for Field2D {
    #[inline(always)]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.ny + j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> GridSpec {
        GridSpec::new(10.0, 10.0, 5, 5).unwrap()
    }

    #[test]
    fn test_indexing_round_trip() {
        let mut f = Field2D::zeros(3, 4);
        f[(2, 3)] = 7.0;
        f[(0, 0)] = -1.0;
        assert_eq!(f[(2, 3)], 7.0);
        assert_eq!(f[(0, 0)], -1.0);
        assert_eq!(f.as_slice()[2 * 4 + 3], 7.0);
    }

    #[test]
    fn test_from_fn_evaluates_coordinates() {
        let grid = small_grid();
        let f = Field2D::from_fn(&grid, |x, y| x + 10.0 * y);
        // Corner points of the centered domain [-5, 5] x [-5, 5].
        assert!((f[(0, 0)] - (-5.0 + 10.0 * -5.0)).abs() < 1e-12);
        assert!((f[(4, 4)] - (5.0 + 10.0 * 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_mean_and_max_abs() {
        let mut f = Field2D::filled(2, 2, 1.0);
        f[(1, 1)] = -3.0;
        assert!((f.mean() - 0.0).abs() < 1e-12);
        assert_eq!(f.max_abs(), 3.0);
        assert_eq!(f.max(), 1.0);
    }

    #[test]
    #[should_panic(expected = "mean of an empty field")]
    fn test_mean_of_empty_field_panics() {
        Field2D::zeros(0, 0).mean();
    }

    #[test]
    fn test_find_non_finite() {
        let mut f = Field2D::zeros(3, 3);
        assert!(f.find_non_finite().is_none());
        f[(1, 2)] = f64::NAN;
        assert_eq!(f.find_non_finite(), Some((1, 2)));
    }

    #[test]
    fn test_check_shape() {
        let grid = small_grid();
        assert!(Field2D::zeros(5, 5).check_shape("wind", &grid).is_ok());
        let err = Field2D::zeros(4, 5).check_shape("wind", &grid).unwrap_err();
        assert!(err.to_string().contains("wind"));
    }
}
