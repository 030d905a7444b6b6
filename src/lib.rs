//! # swe2d
//!
//! A finite-difference solver for the 2D shallow water equations on a
//! closed rectangular domain. The momentum equations are linear, the
//! continuity equation is solved in its nonlinear flux form:
//!
//! ```text
//! du/dt - f v = -g d(eta)/dx + tau_x / (rho_0 D) - kappa u
//! dv/dt + f u = -g d(eta)/dy + tau_y / (rho_0 D) - kappa v
//! d(eta)/dt + d((eta + D) u)/dx + d((eta + D) v)/dy = 0
//! ```
//!
//! with f = f_0 + beta*y the beta-plane Coriolis parameter and D the
//! resting depth (mean depth plus optional bathymetry). Each forcing term
//! is individually switchable. Time stepping is forward-in-time with the
//! momentum update feeding the upwind continuity update within the same
//! step; the scheme is stable under `dt <= min(dx, dy) / sqrt(g D_max)`.
//!
//! Building blocks:
//! - Grid and field containers ([`GridSpec`], [`Field2D`])
//! - Physical configuration ([`PhysicalParameters`], [`CoriolisParameter`],
//!   [`WindStress`])
//! - State and snapshots ([`SimulationState`], [`Snapshot`])
//! - The solver core ([`TimeStepper`], [`solver::stable_dt`])
//! - The run loop ([`SimulationRunner`])
//!
//! ```
//! use swe2d::{GridSpec, PhysicalParameters, SimulationState, TimeStepper};
//!
//! let grid = GridSpec::square(1.0e6, 150).unwrap();
//! let params = PhysicalParameters::builder(9.81, 100.0).build(&grid).unwrap();
//! let mut stepper = TimeStepper::new(grid.clone(), params).unwrap();
//!
//! let sigma: f64 = 0.05e6;
//! let mut state = SimulationState::with_elevation(&grid, |x, y| {
//!     (-(x * x + y * y) / (2.0 * sigma.powi(2))).exp()
//! });
//! stepper.advance(&mut state).unwrap();
//! assert_eq!(state.step_index, 1);
//! ```

pub mod error;
pub mod field;
pub mod forcing;
pub mod grid;
pub mod params;
pub mod simulation;
pub mod solver;
pub mod state;

// Re-export the main types for convenience
pub use error::ModelError;
pub use field::Field2D;
pub use forcing::{CoriolisParameter, WindStress};
pub use grid::GridSpec;
pub use params::{PhysicalParameters, PhysicalParametersBuilder};
pub use simulation::{RunConfig, RunReport, SimulationRunner};
pub use solver::{DEFAULT_SAFETY_FACTOR, TimeStepper, stable_dt};
pub use state::{SimulationState, Snapshot};
