//! Explicit time stepping for the shallow water equations.
//!
//! One step advances the coupled fields (u, v, eta) with a forward-in-time
//! scheme on the Arakawa C-grid described in `state`:
//!
//! 1. Momentum first, from previous-step values only:
//!    `u* = u + dt (f v - g deta/dx + tau_x/(rho_0 D) - kappa u)` and the
//!    `v` counterpart with `-f u`. The elevation difference across a
//!    velocity face is a centered gradient at that face.
//! 2. Continuity second, in flux form with first-order upwind face depths
//!    evaluated on the *updated* velocities (a staggered coupling that
//!    improves stability):
//!    `eta* = eta - dt (d((eta + D) u*)/dx + d((eta + D) v*)/dy)`.
//!    At a face with exactly zero velocity the upstream (backward) depth
//!    is used; the flux vanishes there either way.
//! 3. Wall closure (zero normal boundary velocities), then a non-finite
//!    scan and an atomic buffer swap.
//!
//! Double-buffering guarantees that no value is read after being
//! overwritten within a step; on any error the live state is untouched.
//! The per-row sweeps depend only on previous-step values and run under
//! rayon when the `parallel` feature is enabled, with bit-identical
//! results.

use std::mem;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::ModelError;
use crate::field::Field2D;
use crate::grid::GridSpec;
use crate::params::PhysicalParameters;
use crate::solver::boundary;
use crate::solver::cfl::{self, DEFAULT_SAFETY_FACTOR};
use crate::state::SimulationState;

/// Upwind selection: take the upstream value for the given face velocity.
///
/// Backward (upstream) choice at exactly zero velocity.
#[inline(always)]
fn upwind_face(vel: f64, upstream: f64, downstream: f64) -> f64 {
    if vel >= 0.0 { upstream } else { downstream }
}

/// Explicit solver core: advances a [`SimulationState`] by one fixed step.
///
/// Owns the scratch buffers for double-buffered updates; `advance` swaps
/// them into the state at each step boundary.
#[derive(Clone, Debug)]
pub struct TimeStepper {
    grid: GridSpec,
    params: PhysicalParameters,
    dt: f64,
    u_next: Field2D,
    v_next: Field2D,
    eta_next: Field2D,
}

impl TimeStepper {
    /// Create a stepper with the CFL time step at the default safety
    /// factor of 0.1.
    pub fn new(grid: GridSpec, params: PhysicalParameters) -> Result<Self, ModelError> {
        Self::with_safety_factor(grid, params, DEFAULT_SAFETY_FACTOR)
    }

    /// Create a stepper with the CFL time step at a custom safety factor.
    pub fn with_safety_factor(
        grid: GridSpec,
        params: PhysicalParameters,
        safety: f64,
    ) -> Result<Self, ModelError> {
        let dt = cfl::stable_dt(&grid, &params, safety)?;
        Self::with_dt(grid, params, dt)
    }

    /// Create a stepper with an explicitly chosen time step.
    ///
    /// The step is not checked against the CFL limit; an over-long step
    /// will surface as [`ModelError::NumericalDivergence`] during
    /// `advance`.
    pub fn with_dt(grid: GridSpec, params: PhysicalParameters, dt: f64) -> Result<Self, ModelError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::UnstableConfiguration(format!(
                "time step must be finite and positive, got {dt}"
            )));
        }
        params.rest_depth().check_shape("rest_depth", &grid).map_err(|_| {
            ModelError::Configuration(
                "physical parameters were built for a different grid".to_string(),
            )
        })?;
        let (nx, ny) = (grid.nx(), grid.ny());
        Ok(Self {
            grid,
            params,
            dt,
            u_next: Field2D::zeros(nx, ny),
            v_next: Field2D::zeros(nx, ny),
            eta_next: Field2D::zeros(nx, ny),
        })
    }

    /// The fixed time step (s).
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// The grid this stepper was built for.
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// The physical parameters in effect.
    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Advance `state` by one time step.
    ///
    /// On success the state holds the new fields and its clock/step index
    /// have moved. On [`ModelError::NumericalDivergence`] the state is
    /// left exactly as it was.
    pub fn advance(&mut self, state: &mut SimulationState) -> Result<(), ModelError> {
        state.u.check_shape("u", &self.grid)?;
        state.v.check_shape("v", &self.grid)?;
        state.eta.check_shape("eta", &self.grid)?;

        let Self {
            grid,
            params,
            dt,
            u_next,
            v_next,
            eta_next,
        } = self;
        let dt = *dt;
        let grid = &*grid;
        let params = &*params;
        let ny = grid.ny();
        let prev = &*state;

        // Momentum sweep over x-rows, reading only the previous state.
        {
            #[cfg(not(feature = "parallel"))]
            let rows = u_next
                .as_mut_slice()
                .chunks_mut(ny)
                .zip(v_next.as_mut_slice().chunks_mut(ny))
                .enumerate();
            #[cfg(feature = "parallel")]
            let rows = u_next
                .as_mut_slice()
                .par_chunks_mut(ny)
                .zip(v_next.as_mut_slice().par_chunks_mut(ny))
                .enumerate();
            rows.for_each(|(i, (u_row, v_row))| {
                momentum_row(i, grid, params, dt, prev, u_row, v_row);
            });
        }

        boundary::close_walls(u_next, v_next);

        // Continuity sweep on the updated velocities.
        {
            let u_new = &*u_next;
            let v_new = &*v_next;
            #[cfg(not(feature = "parallel"))]
            let rows = eta_next.as_mut_slice().chunks_mut(ny).enumerate();
            #[cfg(feature = "parallel")]
            let rows = eta_next.as_mut_slice().par_chunks_mut(ny).enumerate();
            rows.for_each(|(i, eta_row)| {
                continuity_row(i, grid, params, dt, &prev.eta, u_new, v_new, eta_row);
            });
        }

        let step = state.step_index + 1;
        for (field, name) in [(&*u_next, "u"), (&*v_next, "v"), (&*eta_next, "eta")] {
            if let Some((i, j)) = field.find_non_finite() {
                return Err(ModelError::NumericalDivergence {
                    field: name,
                    i,
                    j,
                    step,
                });
            }
        }

        mem::swap(&mut state.u, u_next);
        mem::swap(&mut state.v, v_next);
        mem::swap(&mut state.eta, eta_next);
        state.time += dt;
        state.step_index = step;
        Ok(())
    }
}

/// Momentum update for x-row `i`, writing the new u and v rows.
///
/// The wall faces (east for u, north for v) are written with their
/// previous values; `boundary::close_walls` zeroes them right after the
/// sweep.
fn momentum_row(
    i: usize,
    grid: &GridSpec,
    params: &PhysicalParameters,
    dt: f64,
    state: &SimulationState,
    u_row: &mut [f64],
    v_row: &mut [f64],
) {
    let (nx, ny) = (grid.nx(), grid.ny());
    let depth = params.rest_depth();
    let wind = params.wind.as_ref().filter(|_| params.use_wind);
    let gdx = params.g / grid.dx();
    let gdy = params.g / grid.dy();

    for j in 0..ny {
        let u0 = state.u[(i, j)];
        let v0 = state.v[(i, j)];
        let mut du = 0.0;
        let mut dv = 0.0;

        if i + 1 < nx {
            du -= gdx * (state.eta[(i + 1, j)] - state.eta[(i, j)]);
        }
        if j + 1 < ny {
            dv -= gdy * (state.eta[(i, j + 1)] - state.eta[(i, j)]);
        }
        if params.use_coriolis {
            let f = params.f_row(j);
            du += f * v0;
            dv -= f * u0;
        }
        if let Some(w) = wind {
            let inv_rho_d = 1.0 / (params.rho_0 * depth[(i, j)]);
            du += w.tau_x[(i, j)] * inv_rho_d;
            dv += w.tau_y[(i, j)] * inv_rho_d;
        }
        if params.use_friction {
            du -= params.kappa * u0;
            dv -= params.kappa * v0;
        }

        u_row[j] = u0 + dt * du;
        v_row[j] = v0 + dt * dv;
    }
}

/// Continuity update for x-row `i`: flux-form divergence of
/// `(eta + D) * velocity` with upwind face depths.
///
/// Edge cells use one-sided flux differences; the closed west/south wall
/// faces carry zero flux, and the east/north faces carry zero velocity
/// after wall closure, so `sum(eta)` is conserved to round-off.
#[allow(clippy::too_many_arguments)]
fn continuity_row(
    i: usize,
    grid: &GridSpec,
    params: &PhysicalParameters,
    dt: f64,
    eta: &Field2D,
    u_new: &Field2D,
    v_new: &Field2D,
    eta_row: &mut [f64],
) {
    let (nx, ny) = (grid.nx(), grid.ny());
    let depth = params.rest_depth();
    let total = |ii: usize, jj: usize| eta[(ii, jj)] + depth[(ii, jj)];

    for j in 0..ny {
        let flux_east = {
            let ue = u_new[(i, j)];
            let h = if i + 1 < nx {
                upwind_face(ue, total(i, j), total(i + 1, j))
            } else {
                total(i, j)
            };
            ue * h
        };
        let flux_west = if i == 0 {
            0.0
        } else {
            let uw = u_new[(i - 1, j)];
            uw * upwind_face(uw, total(i - 1, j), total(i, j))
        };
        let flux_north = {
            let vn = v_new[(i, j)];
            let h = if j + 1 < ny {
                upwind_face(vn, total(i, j), total(i, j + 1))
            } else {
                total(i, j)
            };
            vn * h
        };
        let flux_south = if j == 0 {
            0.0
        } else {
            let vs = v_new[(i, j - 1)];
            vs * upwind_face(vs, total(i, j - 1), total(i, j))
        };

        eta_row[j] = eta[(i, j)]
            - dt * ((flux_east - flux_west) / grid.dx() + (flux_north - flux_south) / grid.dy());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forcing::{CoriolisParameter, WindStress};

    const TOL: f64 = 1e-12;

    fn small_setup() -> (GridSpec, PhysicalParameters) {
        let grid = GridSpec::square(1.0e5, 20).unwrap();
        let params = PhysicalParameters::builder(9.81, 50.0).build(&grid).unwrap();
        (grid, params)
    }

    #[test]
    fn test_upwind_face_selection() {
        assert_eq!(upwind_face(1.0, 101.0, 99.0), 101.0);
        assert_eq!(upwind_face(-1.0, 101.0, 99.0), 99.0);
        // Backward choice at exactly zero.
        assert_eq!(upwind_face(0.0, 101.0, 99.0), 101.0);
    }

    #[test]
    fn test_flat_rest_state_is_fixed_point() {
        let (grid, params) = small_setup();
        let mut stepper = TimeStepper::new(grid.clone(), params).unwrap();
        // Constant nonzero elevation: no gradients, no flow, no change.
        let mut state = SimulationState::with_elevation(&grid, |_, _| 0.25);
        for _ in 0..20 {
            stepper.advance(&mut state).unwrap();
        }
        assert_eq!(state.u.max_abs(), 0.0);
        assert_eq!(state.v.max_abs(), 0.0);
        for j in 0..grid.ny() {
            for i in 0..grid.nx() {
                assert_eq!(state.eta[(i, j)], 0.25);
            }
        }
        assert_eq!(state.step_index, 20);
    }

    #[test]
    fn test_elevation_bump_drives_flow() {
        let (grid, params) = small_setup();
        let mut stepper = TimeStepper::new(grid.clone(), params).unwrap();
        let sigma: f64 = 1.0e4;
        let mut state = SimulationState::with_elevation(&grid, |x, y| {
            (-(x * x + y * y) / (2.0 * sigma.powi(2))).exp()
        });
        stepper.advance(&mut state).unwrap();
        assert!(state.u.max_abs() > 0.0);
        assert!(state.v.max_abs() > 0.0);
        assert!((state.time - stepper.dt()).abs() < TOL);
    }

    #[test]
    fn test_friction_decays_motion() {
        let grid = GridSpec::square(1.0e5, 10).unwrap();
        let params = PhysicalParameters::builder(9.81, 50.0)
            .friction(1.0e-4)
            .build(&grid)
            .unwrap();
        let kappa = params.kappa;
        let mut stepper = TimeStepper::new(grid.clone(), params).unwrap();
        let mut state = SimulationState::at_rest(&grid);
        // Uniform interior eastward flow, flat surface.
        for i in 0..grid.nx() - 1 {
            for j in 0..grid.ny() {
                state.u[(i, j)] = 0.5;
            }
        }
        let dt = stepper.dt();
        stepper.advance(&mut state).unwrap();
        let expected = 0.5 * (1.0 - dt * kappa);
        assert!((state.u[(4, 4)] - expected).abs() < TOL);
        assert!(state.u[(4, 4)] < 0.5);
        assert_eq!(state.v.max_abs(), 0.0);
    }

    #[test]
    fn test_wind_spins_up_from_rest() {
        let grid = GridSpec::square(1.0e5, 10).unwrap();
        let params = PhysicalParameters::builder(9.81, 50.0)
            .wind(WindStress::constant(&grid, 0.1, 0.0))
            .build(&grid)
            .unwrap();
        let mut stepper = TimeStepper::new(grid.clone(), params).unwrap();
        let mut state = SimulationState::at_rest(&grid);
        stepper.advance(&mut state).unwrap();
        // tau_x / (rho_0 * H) * dt, uniform over non-wall faces.
        let expected = 0.1 / (1024.0 * 50.0) * stepper.dt();
        assert!((state.u[(3, 3)] - expected).abs() < TOL);
        assert_eq!(state.u[(grid.nx() - 1, 3)], 0.0);
        assert_eq!(state.v.max_abs(), 0.0);
    }

    #[test]
    fn test_coriolis_deflects_flow() {
        let grid = GridSpec::square(1.0e5, 10).unwrap();
        let params = PhysicalParameters::builder(9.81, 50.0)
            .coriolis(CoriolisParameter::f_plane(1.0e-4))
            .build(&grid)
            .unwrap();
        let mut stepper = TimeStepper::new(grid.clone(), params).unwrap();
        let mut state = SimulationState::at_rest(&grid);
        for i in 0..grid.nx() - 1 {
            for j in 0..grid.ny() {
                state.u[(i, j)] = 1.0;
            }
        }
        stepper.advance(&mut state).unwrap();
        // Northern hemisphere: eastward flow deflects southward.
        assert!(state.v[(4, 4)] < 0.0);
    }

    /// Sharp elevation spike a few cells wide, for blow-up scenarios.
    fn spike(grid: &GridSpec, amplitude: f64) -> SimulationState {
        let sigma = grid.dx();
        SimulationState::with_elevation(grid, |x, y| {
            amplitude * (-(x * x + y * y) / (2.0 * sigma * sigma)).exp()
        })
    }

    #[test]
    fn test_oversized_dt_diverges() {
        let (grid, params) = small_setup();
        // Far beyond the CFL limit of roughly 70 s.
        let mut stepper = TimeStepper::with_dt(grid.clone(), params, 1.0e5).unwrap();
        let mut state = spike(&grid, 1.0e3);
        let mut diverged = false;
        for _ in 0..30 {
            match stepper.advance(&mut state) {
                Ok(()) => {}
                Err(ModelError::NumericalDivergence { step, .. }) => {
                    assert!(step > 0);
                    diverged = true;
                    break;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert!(diverged, "blow-up was not detected within 30 steps");
    }

    #[test]
    fn test_state_untouched_on_divergence() {
        let (grid, params) = small_setup();
        let mut stepper = TimeStepper::with_dt(grid.clone(), params, 1.0e6).unwrap();
        let mut state = spike(&grid, 1.0e6);
        let mut last_good = state.snapshot();
        for _ in 0..100 {
            match stepper.advance(&mut state) {
                Ok(()) => last_good = state.snapshot(),
                Err(_) => break,
            }
        }
        assert_eq!(state.eta, last_good.eta);
        assert_eq!(state.step_index, last_good.step_index);
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let (grid, params) = small_setup();
        assert!(TimeStepper::with_dt(grid.clone(), params.clone(), 0.0).is_err());
        assert!(TimeStepper::with_dt(grid.clone(), params.clone(), -1.0).is_err());
        assert!(TimeStepper::with_dt(grid, params, f64::NAN).is_err());
    }

    #[test]
    fn test_mismatched_state_rejected() {
        let (grid, params) = small_setup();
        let other = GridSpec::square(1.0e5, 7).unwrap();
        let mut stepper = TimeStepper::new(grid, params).unwrap();
        let mut state = SimulationState::at_rest(&other);
        assert!(matches!(
            stepper.advance(&mut state),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }
}
