//! External forcing: Coriolis parameter and surface wind stress.
//!
//! The Coriolis parameter follows the beta-plane approximation
//! f(y) = f_0 + beta*y, which covers both the f-plane (beta = 0) and the
//! latitude-varying case. Wind stress is a static surface field
//! (tau_x, tau_y) evaluated once at setup; it enters the momentum
//! equations as tau / (rho_0 * D) where D is the local rest depth.

use crate::error::ModelError;
use crate::field::Field2D;
use crate::grid::GridSpec;

/// Coriolis parameter on the beta plane: f(y) = f_0 + beta * y.
///
/// # Example
///
/// ```
/// use swe2d::CoriolisParameter;
///
/// let coriolis = CoriolisParameter::beta_plane(1.0e-4, 2.0e-11);
/// assert!((coriolis.f_at(0.0) - 1.0e-4).abs() < 1e-18);
/// assert!((coriolis.f_at(5.0e5) - 1.1e-4).abs() < 1e-18);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoriolisParameter {
    /// Fixed part of the Coriolis parameter (1/s).
    pub f_0: f64,
    /// Meridional gradient of the Coriolis parameter (1/(m s)).
    pub beta: f64,
}

impl CoriolisParameter {
    /// f-plane: constant f, no meridional variation.
    pub fn f_plane(f_0: f64) -> Self {
        Self { f_0, beta: 0.0 }
    }

    /// Beta plane: f varies linearly with y.
    pub fn beta_plane(f_0: f64, beta: f64) -> Self {
        Self { f_0, beta }
    }

    /// Coriolis parameter at meridional coordinate `y`.
    #[inline]
    pub fn f_at(&self, y: f64) -> f64 {
        self.f_0 + self.beta * y
    }

    /// Whether this is a pure f-plane (no beta variation).
    pub fn is_f_plane(&self) -> bool {
        self.beta == 0.0
    }

    /// Precompute f for every row of the grid.
    pub fn per_row(&self, grid: &GridSpec) -> Vec<f64> {
        grid.y_axis().iter().map(|&y| self.f_at(y)).collect()
    }
}

/// Static surface wind stress field (kg/(m s^2)).
#[derive(Clone, Debug, PartialEq)]
pub struct WindStress {
    /// Zonal wind stress component tau_x(x, y).
    pub tau_x: Field2D,
    /// Meridional wind stress component tau_y(x, y).
    pub tau_y: Field2D,
}

impl WindStress {
    /// Spatially uniform wind stress.
    pub fn constant(grid: &GridSpec, tau_x: f64, tau_y: f64) -> Self {
        Self {
            tau_x: Field2D::filled(grid.nx(), grid.ny(), tau_x),
            tau_y: Field2D::filled(grid.nx(), grid.ny(), tau_y),
        }
    }

    /// Build the stress field from provider closures evaluated at each
    /// grid point.
    pub fn from_fn<Fx, Fy>(grid: &GridSpec, tau_x: Fx, tau_y: Fy) -> Self
    where
        Fx: FnMut(f64, f64) -> f64,
        Fy: FnMut(f64, f64) -> f64,
    {
        Self {
            tau_x: Field2D::from_fn(grid, tau_x),
            tau_y: Field2D::from_fn(grid, tau_y),
        }
    }

    /// Wrap externally built stress arrays, checking their shape.
    pub fn from_fields(
        grid: &GridSpec,
        tau_x: Field2D,
        tau_y: Field2D,
    ) -> Result<Self, ModelError> {
        tau_x.check_shape("tau_x", grid)?;
        tau_y.check_shape("tau_y", grid)?;
        Ok(Self { tau_x, tau_y })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-15;

    #[test]
    fn test_f_plane_is_constant() {
        let c = CoriolisParameter::f_plane(1.2e-4);
        assert!(c.is_f_plane());
        assert!((c.f_at(-1.0e6) - 1.2e-4).abs() < TOL);
        assert!((c.f_at(1.0e6) - 1.2e-4).abs() < TOL);
    }

    #[test]
    fn test_beta_plane_variation() {
        let c = CoriolisParameter::beta_plane(1.0e-4, 2.0e-11);
        // f(y) = f_0 + beta * y at y = 1e6 m: 1e-4 + 2e-5
        assert!((c.f_at(1.0e6) - 1.2e-4).abs() < TOL);
        assert!(!c.is_f_plane());
    }

    #[test]
    fn test_per_row_matches_axis() {
        let grid = GridSpec::square(1.0e6, 11).unwrap();
        let c = CoriolisParameter::beta_plane(1.0e-4, 2.0e-11);
        let f = c.per_row(&grid);
        assert_eq!(f.len(), 11);
        for (j, &y) in grid.y_axis().iter().enumerate() {
            assert!((f[j] - c.f_at(y)).abs() < TOL);
        }
    }

    #[test]
    fn test_wind_from_fn() {
        let grid = GridSpec::square(2.0, 3).unwrap();
        let wind = WindStress::from_fn(&grid, |x, _| x, |_, y| -y);
        assert!((wind.tau_x[(0, 1)] + 1.0).abs() < TOL);
        assert!((wind.tau_y[(1, 2)] + 1.0).abs() < TOL);
    }

    #[test]
    fn test_wind_shape_checked() {
        let grid = GridSpec::square(2.0, 3).unwrap();
        let ok = WindStress::from_fields(&grid, Field2D::zeros(3, 3), Field2D::zeros(3, 3));
        assert!(ok.is_ok());
        let bad = WindStress::from_fields(&grid, Field2D::zeros(2, 3), Field2D::zeros(3, 3));
        assert!(bad.is_err());
    }
}
