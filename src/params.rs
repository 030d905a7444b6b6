//! Physical model parameters.
//!
//! A [`PhysicalParameters`] value is built once at startup, validated
//! eagerly, and passed by reference to every solver call. Each physical
//! term (Coriolis, bottom friction, wind stress, variable depth) is gated
//! by an explicit boolean flag; the gated data lives alongside the flag
//! and is shape-checked against the grid at build time.

use std::fmt;

use crate::error::ModelError;
use crate::field::Field2D;
use crate::forcing::{CoriolisParameter, WindStress};
use crate::grid::GridSpec;

/// Immutable physical configuration for a simulation.
///
/// Constructed through [`PhysicalParameters::builder`]:
///
/// ```
/// use swe2d::{GridSpec, PhysicalParameters, CoriolisParameter};
///
/// let grid = GridSpec::square(1.0e6, 150).unwrap();
/// let params = PhysicalParameters::builder(9.81, 100.0)
///     .coriolis(CoriolisParameter::beta_plane(1.0e-4, 2.0e-11))
///     .friction(1.0e-6)
///     .build(&grid)
///     .unwrap();
/// assert!(params.use_coriolis);
/// assert!(!params.use_wind);
/// ```
#[derive(Clone, Debug)]
pub struct PhysicalParameters {
    /// Acceleration of gravity (m/s^2).
    pub g: f64,
    /// Resting depth of the fluid H (m).
    pub mean_depth: f64,
    /// Reference fluid density rho_0 (kg/m^3).
    pub rho_0: f64,
    /// Linear bottom friction coefficient kappa (1/s).
    pub kappa: f64,
    /// Whether the Coriolis terms enter the momentum equations.
    pub use_coriolis: bool,
    /// Whether linear bottom friction enters the momentum equations.
    pub use_friction: bool,
    /// Whether wind stress enters the momentum equations.
    pub use_wind: bool,
    /// Whether bathymetry modifies the resting depth.
    pub use_variable_depth: bool,
    /// Coriolis parameter (consulted only when `use_coriolis`).
    pub coriolis: CoriolisParameter,
    /// Wind stress field (present when `use_wind`).
    pub wind: Option<WindStress>,
    /// Bathymetry h_b(x, y) added to `mean_depth` (present when
    /// `use_variable_depth`).
    pub bathymetry: Option<Field2D>,
    // Precomputed at build time, invariant afterwards.
    f_row: Vec<f64>,
    rest_depth: Field2D,
    max_rest_depth: f64,
}

impl PhysicalParameters {
    /// Start building parameters from gravity and mean depth.
    pub fn builder(g: f64, mean_depth: f64) -> PhysicalParametersBuilder {
        PhysicalParametersBuilder {
            g,
            mean_depth,
            rho_0: 1024.0,
            kappa: 0.0,
            coriolis: None,
            wind: None,
            bathymetry: None,
        }
    }

    /// Coriolis parameter for grid row `j`, precomputed as f(y_j).
    ///
    /// Zero when Coriolis is disabled.
    #[inline]
    pub fn f_row(&self, j: usize) -> f64 {
        self.f_row[j]
    }

    /// Rest depth D(i, j): `mean_depth` plus bathymetry when variable
    /// depth is enabled, constant `mean_depth` otherwise.
    #[inline]
    pub fn rest_depth(&self) -> &Field2D {
        &self.rest_depth
    }

    /// Maximum total rest depth over the grid, used by the CFL estimate.
    #[inline]
    pub fn max_rest_depth(&self) -> f64 {
        self.max_rest_depth
    }
}

impl fmt::Display for PhysicalParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "g = {} m/s^2, H = {} m, rho_0 = {} kg/m^3", self.g, self.mean_depth, self.rho_0)?;
        writeln!(
            f,
            "use_coriolis = {}, use_friction = {}, use_wind = {}, use_variable_depth = {}",
            self.use_coriolis, self.use_friction, self.use_wind, self.use_variable_depth
        )?;
        if self.use_coriolis {
            writeln!(f, "f_0 = {} 1/s, beta = {} 1/(m s)", self.coriolis.f_0, self.coriolis.beta)?;
        }
        if self.use_friction {
            writeln!(f, "kappa = {} 1/s", self.kappa)?;
        }
        Ok(())
    }
}

/// Builder for [`PhysicalParameters`].
///
/// Each `with`-style method enables the corresponding physical term;
/// [`build`](Self::build) validates everything against the grid.
#[derive(Clone, Debug)]
pub struct PhysicalParametersBuilder {
    g: f64,
    mean_depth: f64,
    rho_0: f64,
    kappa: f64,
    coriolis: Option<CoriolisParameter>,
    wind: Option<WindStress>,
    bathymetry: Option<Field2D>,
}

impl PhysicalParametersBuilder {
    /// Set the reference density (default 1024 kg/m^3, sea water).
    pub fn density(mut self, rho_0: f64) -> Self {
        self.rho_0 = rho_0;
        self
    }

    /// Enable the Coriolis force.
    pub fn coriolis(mut self, coriolis: CoriolisParameter) -> Self {
        self.coriolis = Some(coriolis);
        self
    }

    /// Enable linear bottom friction with coefficient `kappa` (1/s).
    pub fn friction(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    /// Enable surface wind stress.
    pub fn wind(mut self, wind: WindStress) -> Self {
        self.wind = Some(wind);
        self
    }

    /// Enable variable depth: `bathymetry` is added to the mean depth.
    pub fn bathymetry(mut self, bathymetry: Field2D) -> Self {
        self.bathymetry = Some(bathymetry);
        self
    }

    /// Validate the configuration against `grid` and freeze it.
    ///
    /// # Errors
    ///
    /// [`ModelError::Configuration`] for non-physical scalars and
    /// [`ModelError::ShapeMismatch`] for forcing arrays that do not match
    /// the grid shape.
    pub fn build(self, grid: &GridSpec) -> Result<PhysicalParameters, ModelError> {
        if !(self.mean_depth > 0.0) {
            return Err(ModelError::Configuration(format!(
                "mean depth must be strictly positive, got {}",
                self.mean_depth
            )));
        }
        if !(self.rho_0 > 0.0) {
            return Err(ModelError::Configuration(format!(
                "density must be strictly positive, got {}",
                self.rho_0
            )));
        }
        if !(self.g >= 0.0) {
            return Err(ModelError::Configuration(format!(
                "gravity must be non-negative, got {}",
                self.g
            )));
        }
        if !(self.kappa >= 0.0) {
            return Err(ModelError::Configuration(format!(
                "friction coefficient must be non-negative, got {}",
                self.kappa
            )));
        }

        if let Some(wind) = &self.wind {
            wind.tau_x.check_shape("tau_x", grid)?;
            wind.tau_y.check_shape("tau_y", grid)?;
        }
        if let Some(bathymetry) = &self.bathymetry {
            bathymetry.check_shape("bathymetry", grid)?;
        }

        let use_coriolis = self.coriolis.is_some();
        let use_friction = self.kappa > 0.0;
        let use_wind = self.wind.is_some();
        let use_variable_depth = self.bathymetry.is_some();

        let coriolis = self.coriolis.unwrap_or(CoriolisParameter::f_plane(0.0));
        let f_row = if use_coriolis {
            coriolis.per_row(grid)
        } else {
            vec![0.0; grid.ny()]
        };

        let rest_depth = match &self.bathymetry {
            Some(hb) => {
                let mut d = hb.clone();
                for v in d.as_mut_slice() {
                    *v += self.mean_depth;
                }
                d
            }
            None => Field2D::filled(grid.nx(), grid.ny(), self.mean_depth),
        };
        let max_rest_depth = rest_depth.max();

        Ok(PhysicalParameters {
            g: self.g,
            mean_depth: self.mean_depth,
            rho_0: self.rho_0,
            kappa: self.kappa,
            use_coriolis,
            use_friction,
            use_wind,
            use_variable_depth,
            coriolis,
            wind: self.wind,
            bathymetry: self.bathymetry,
            f_row,
            rest_depth,
            max_rest_depth,
        })
    }
}
