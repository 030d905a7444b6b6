//! Mutable simulation state and read-only snapshots.
//!
//! Grid staggering (Arakawa C): all three arrays share the `(nx, ny)`
//! shape, with `eta[i][j]` at the cell center, `u[i][j]` on the east face
//! of cell `(i, j)` and `v[i][j]` on the north face. The stepper relies on
//! this offset convention; see `solver::stepper`.

use crate::field::Field2D;
use crate::grid::GridSpec;

/// The prognostic fields (u, v, eta) at one instant.
///
/// Mutated by the stepper via whole-buffer swaps at step boundaries;
/// within a step the previous state is only ever read.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// Zonal velocity u(x, y) (m/s), staggered to east cell faces.
    pub u: Field2D,
    /// Meridional velocity v(x, y) (m/s), staggered to north cell faces.
    pub v: Field2D,
    /// Surface elevation eta(x, y) (m) at cell centers.
    pub eta: Field2D,
    /// Model time (s).
    pub time: f64,
    /// Number of completed steps.
    pub step_index: usize,
}

impl SimulationState {
    /// Fluid at rest: zero velocity, flat zero elevation.
    pub fn at_rest(grid: &GridSpec) -> Self {
        Self {
            u: Field2D::zeros(grid.nx(), grid.ny()),
            v: Field2D::zeros(grid.nx(), grid.ny()),
            eta: Field2D::zeros(grid.nx(), grid.ny()),
            time: 0.0,
            step_index: 0,
        }
    }

    /// Fluid at rest under a prescribed initial elevation.
    ///
    /// `eta0` is a pure function of physical coordinates, called once per
    /// grid point. A Gaussian bump is the classic choice:
    ///
    /// ```
    /// use swe2d::{GridSpec, SimulationState};
    ///
    /// let grid = GridSpec::square(1.0e6, 50).unwrap();
    /// let sigma: f64 = 0.05e6;
    /// let state = SimulationState::with_elevation(&grid, |x, y| {
    ///     (-(x * x + y * y) / (2.0 * sigma.powi(2))).exp()
    /// });
    /// assert!(state.eta[(25, 25)] > 0.9);
    /// ```
    pub fn with_elevation<F>(grid: &GridSpec, eta0: F) -> Self
    where
        F: FnMut(f64, f64) -> f64,
    {
        Self {
            eta: Field2D::from_fn(grid, eta0),
            ..Self::at_rest(grid)
        }
    }

    /// Take a read-only deep copy of the current fields.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            u: self.u.clone(),
            v: self.v.clone(),
            eta: self.eta.clone(),
            time: self.time,
            step_index: self.step_index,
        }
    }
}

/// A read-only copy of the state, safe to hand to consumers while the
/// runner keeps stepping the live state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Zonal velocity at sampling time.
    pub u: Field2D,
    /// Meridional velocity at sampling time.
    pub v: Field2D,
    /// Surface elevation at sampling time.
    pub eta: Field2D,
    /// Model time (s).
    pub time: f64,
    /// Step index the snapshot was taken at.
    pub step_index: usize,
}
