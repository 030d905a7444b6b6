//! Rectangular domain description.
//!
//! The domain is a closed box of extent `lx` by `ly` meters, discretized
//! by `nx` by `ny` grid points with uniform spacing. Coordinate axes are
//! centered on the origin: `x` spans `[-lx/2, lx/2]` and `y` spans
//! `[-ly/2, ly/2]`.

use std::fmt;

use crate::error::ModelError;

/// Immutable grid specification: extents, resolution and derived spacing.
///
/// # Example
///
/// ```
/// use swe2d::GridSpec;
///
/// let grid = GridSpec::new(1.0e6, 1.0e6, 150, 150).unwrap();
/// assert!((grid.dx() - 1.0e6 / 149.0).abs() < 1e-9);
/// assert_eq!(grid.x(0), -5.0e5);
/// assert_eq!(grid.x(149), 5.0e5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    lx: f64,
    ly: f64,
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
}

impl GridSpec {
    /// Create a grid specification.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Configuration`] if either extent is
    /// non-positive or either point count is below 2.
    pub fn new(lx: f64, ly: f64, nx: usize, ny: usize) -> Result<Self, ModelError> {
        if !(lx > 0.0) || !(ly > 0.0) {
            return Err(ModelError::Configuration(format!(
                "domain extents must be positive, got lx = {lx}, ly = {ly}"
            )));
        }
        if nx < 2 || ny < 2 {
            return Err(ModelError::Configuration(format!(
                "grid needs at least 2 points per direction, got nx = {nx}, ny = {ny}"
            )));
        }
        let dx = lx / (nx - 1) as f64;
        let dy = ly / (ny - 1) as f64;
        Ok(Self {
            lx,
            ly,
            nx,
            ny,
            dx,
            dy,
        })
    }

    /// Square grid: same extent and point count in both directions.
    pub fn square(l: f64, n: usize) -> Result<Self, ModelError> {
        Self::new(l, l, n, n)
    }

    /// Domain extent in the x-direction (m).
    #[inline]
    pub fn lx(&self) -> f64 {
        self.lx
    }

    /// Domain extent in the y-direction (m).
    #[inline]
    pub fn ly(&self) -> f64 {
        self.ly
    }

    /// Number of grid points in the x-direction.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of grid points in the y-direction.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Grid spacing in the x-direction (m).
    #[inline]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Grid spacing in the y-direction (m).
    #[inline]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Total number of grid points.
    #[inline]
    pub fn total_points(&self) -> usize {
        self.nx * self.ny
    }

    /// Physical x-coordinate of column `i`, centered on the origin.
    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        -0.5 * self.lx + i as f64 * self.dx
    }

    /// Physical y-coordinate of row `j`, centered on the origin.
    #[inline]
    pub fn y(&self, j: usize) -> f64 {
        -0.5 * self.ly + j as f64 * self.dy
    }

    /// The full x-axis as a vector.
    pub fn x_axis(&self) -> Vec<f64> {
        (0..self.nx).map(|i| self.x(i)).collect()
    }

    /// The full y-axis as a vector.
    pub fn y_axis(&self) -> Vec<f64> {
        (0..self.ny).map(|j| self.y(j)).collect()
    }
}

impl fmt::Display for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}×{} points over {:.1}×{:.1} km (dx = {:.1} m, dy = {:.1} m)",
            self.nx,
            self.ny,
            self.lx / 1000.0,
            self.ly / 1000.0,
            self.dx,
            self.dy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_spacing_exact() {
        let grid = GridSpec::new(1.0e6, 2.0e6, 101, 51).unwrap();
        assert_eq!(grid.dx(), 1.0e6 / 100.0);
        assert_eq!(grid.dy(), 2.0e6 / 50.0);
        assert!(grid.dx() > 0.0 && grid.dy() > 0.0);
    }

    #[test]
    fn test_centered_axes() {
        let grid = GridSpec::square(10.0, 11).unwrap();
        let x = grid.x_axis();
        assert_eq!(x.len(), 11);
        assert!((x[0] + 5.0).abs() < 1e-12);
        assert!((x[5]).abs() < 1e-12);
        assert!((x[10] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        assert!(GridSpec::new(0.0, 1.0, 10, 10).is_err());
        assert!(GridSpec::new(1.0, -1.0, 10, 10).is_err());
        assert!(GridSpec::new(1.0, 1.0, 1, 10).is_err());
        assert!(GridSpec::new(1.0, 1.0, 10, 0).is_err());
        assert!(GridSpec::new(f64::NAN, 1.0, 10, 10).is_err());
    }

    #[test]
    fn test_construction_is_bit_deterministic() {
        let a = GridSpec::new(1.0e6, 1.0e6, 150, 150).unwrap();
        let b = GridSpec::new(1.0e6, 1.0e6, 150, 150).unwrap();
        assert_eq!(a.dx().to_bits(), b.dx().to_bits());
        assert_eq!(a.dy().to_bits(), b.dy().to_bits());
    }
}
