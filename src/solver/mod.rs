//! The time-stepping solver core.
//!
//! # Submodules
//!
//! - [`cfl`]: stable time step from the CFL condition
//! - [`stepper`]: the per-step update (momentum, upwind continuity, walls)
//! - [`boundary`]: closed-wall boundary handling

pub mod boundary;
pub mod cfl;
pub mod stepper;

pub use cfl::{DEFAULT_SAFETY_FACTOR, stable_dt};
pub use stepper::TimeStepper;
