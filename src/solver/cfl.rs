//! CFL-derived stable time step.
//!
//! The explicit scheme is stable for
//!
//! ```text
//! dt <= min(dx, dy) / sqrt(g * H_max)
//! ```
//!
//! where H_max is the maximum resting depth. The estimate treats surface
//! elevation perturbations as small against H, so dt is computed once from
//! the static grid and depth rather than re-derived per step. A safety
//! factor well below 1 leaves headroom for the forcing terms.

use crate::error::ModelError;
use crate::grid::GridSpec;
use crate::params::PhysicalParameters;

/// Default CFL safety factor.
pub const DEFAULT_SAFETY_FACTOR: f64 = 0.1;

/// Compute the stable time step `safety * min(dx, dy) / sqrt(g * H_max)`.
///
/// # Errors
///
/// [`ModelError::UnstableConfiguration`] if the maximum depth is
/// non-positive or the resulting dt is non-finite or non-positive
/// (e.g. `g = 0`).
pub fn stable_dt(
    grid: &GridSpec,
    params: &PhysicalParameters,
    safety: f64,
) -> Result<f64, ModelError> {
    let h_max = params.max_rest_depth();
    if !(h_max > 0.0) {
        return Err(ModelError::UnstableConfiguration(format!(
            "maximum total depth must be positive, got {h_max}"
        )));
    }
    let celerity = (params.g * h_max).sqrt();
    let dt = safety * grid.dx().min(grid.dy()) / celerity;
    if !dt.is_finite() || dt <= 0.0 {
        return Err(ModelError::UnstableConfiguration(format!(
            "CFL condition yields unusable time step dt = {dt} \
             (celerity = {celerity}, safety = {safety})"
        )));
    }
    Ok(dt)
}
