//! Driving a solver over many steps.
//!
//! Ties the [`TimeStepper`](crate::solver::TimeStepper) to a step budget
//! and a snapshot consumer.
//!
//! # Example
//! ```ignore
//! use swe2d::{RunConfig, SimulationRunner};
//!
//! let runner = SimulationRunner::new(stepper, RunConfig::new(5000).with_sample_stride(20));
//! let report = runner.run_with_consumer(&mut state, |snap| {
//!     frames.push(snap.eta.clone());
//! })?;
//! ```

mod runner;

pub use runner::{RunConfig, RunReport, SimulationRunner};
