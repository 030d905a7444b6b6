//! Error types for the shallow water model.
//!
//! Configuration and shape errors are detected eagerly at setup and are
//! fatal: the model never runs with invalid static state. Divergence is
//! detected per step and reported with enough context (field, coordinates,
//! step index) to diagnose the instability; recovery policy is left to the
//! caller.

use thiserror::Error;

/// Errors produced by model setup and time stepping.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Invalid static parameter (non-positive depth, degenerate grid, ...).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An externally supplied field array does not match the grid shape.
    #[error("field `{name}` has shape ({actual_nx}, {actual_ny}), expected ({nx}, {ny})")]
    ShapeMismatch {
        /// Name of the offending field.
        name: &'static str,
        /// Expected x-dimension (grid).
        nx: usize,
        /// Expected y-dimension (grid).
        ny: usize,
        /// Actual x-dimension.
        actual_nx: usize,
        /// Actual y-dimension.
        actual_ny: usize,
    },

    /// The CFL computation yielded a non-positive or non-finite time step.
    #[error("unstable configuration: {0}")]
    UnstableConfiguration(String),

    /// A computed field value became NaN or infinite during a step.
    #[error("non-finite {field} at grid point ({i}, {j}) on step {step}")]
    NumericalDivergence {
        /// Which field blew up ("u", "v" or "eta").
        field: &'static str,
        /// x-index of the offending grid point.
        i: usize,
        /// y-index of the offending grid point.
        j: usize,
        /// Step index at which the value was produced.
        step: usize,
    },
}
