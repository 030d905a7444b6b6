//! Simulation runner implementation.
//!
//! Drives the stepper for a configured number of steps, sampling state
//! snapshots at a fixed stride for downstream consumers (animation,
//! analysis). Sampling is synchronous: a slow consumer delays the next
//! step but can never observe a half-updated state.

use std::time::Instant;

use crate::error::ModelError;
use crate::solver::TimeStepper;
use crate::state::{SimulationState, Snapshot};

// =============================================================================
// Run Configuration
// =============================================================================

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Total number of time steps to take.
    pub max_steps: usize,
    /// Produce a snapshot every this many steps; 0 disables sampling.
    pub sample_stride: usize,
    /// Whether to print progress to stdout.
    pub verbose: bool,
}

impl RunConfig {
    /// Run for `max_steps` steps with no sampling.
    pub fn new(max_steps: usize) -> Self {
        Self {
            max_steps,
            sample_stride: 0,
            verbose: false,
        }
    }

    /// Sample a snapshot every `stride` steps.
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Enable progress output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

// =============================================================================
// Run Report
// =============================================================================

/// Statistics from a completed run.
#[derive(Clone, Copy, Debug)]
pub struct RunReport {
    /// Model time reached (s).
    pub final_time: f64,
    /// Number of steps taken.
    pub steps_completed: usize,
    /// Number of snapshots handed to the consumer.
    pub samples_taken: usize,
    /// Wall-clock time spent inside `advance` (s).
    pub stepping_seconds: f64,
    /// Wall-clock time spent copying and consuming snapshots (s).
    pub sampling_seconds: f64,
    /// Total wall-clock time (s).
    pub wall_seconds: f64,
}

// =============================================================================
// Simulation Runner
// =============================================================================

/// High-level driver: a [`TimeStepper`] plus a step budget and sampling
/// policy.
///
/// # Example
///
/// ```
/// use swe2d::{
///     GridSpec, PhysicalParameters, RunConfig, SimulationRunner, SimulationState, TimeStepper,
/// };
///
/// let grid = GridSpec::square(1.0e6, 50).unwrap();
/// let params = PhysicalParameters::builder(9.81, 100.0).build(&grid).unwrap();
/// let stepper = TimeStepper::new(grid.clone(), params).unwrap();
///
/// let sigma: f64 = 0.05e6;
/// let mut state = SimulationState::with_elevation(&grid, |x, y| {
///     (-(x * x + y * y) / (2.0 * sigma.powi(2))).exp()
/// });
///
/// let mut runner = SimulationRunner::new(stepper, RunConfig::new(100).with_sample_stride(20));
/// let mut frames = Vec::new();
/// let report = runner
///     .run_with_consumer(&mut state, |snap| frames.push(snap.clone()))
///     .unwrap();
/// assert_eq!(report.steps_completed, 100);
/// assert_eq!(frames.len(), 5);
/// ```
pub struct SimulationRunner {
    stepper: TimeStepper,
    config: RunConfig,
}

impl SimulationRunner {
    /// Create a runner from a stepper and a run configuration.
    pub fn new(stepper: TimeStepper, config: RunConfig) -> Self {
        Self { stepper, config }
    }

    /// The underlying stepper.
    pub fn stepper(&self) -> &TimeStepper {
        &self.stepper
    }

    /// The run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run without sampling.
    pub fn run(&mut self, state: &mut SimulationState) -> Result<RunReport, ModelError> {
        self.run_with_consumer(state, |_| {})
    }

    /// Run, handing a [`Snapshot`] to `consumer` every `sample_stride`
    /// steps.
    ///
    /// Stops early and returns the error if a step diverges; the state is
    /// then left at the last completed step.
    pub fn run_with_consumer<F>(
        &mut self,
        state: &mut SimulationState,
        mut consumer: F,
    ) -> Result<RunReport, ModelError>
    where
        F: FnMut(&Snapshot),
    {
        let wall_start = Instant::now();
        let mut stepping_seconds = 0.0;
        let mut sampling_seconds = 0.0;
        let mut samples_taken = 0;

        if self.config.verbose {
            println!(
                "Running {} steps of dt = {:.2} s on {}",
                self.config.max_steps,
                self.stepper.dt(),
                self.stepper.grid()
            );
            print!("{}", self.stepper.params());
        }

        for _ in 0..self.config.max_steps {
            let step_start = Instant::now();
            self.stepper.advance(state)?;
            stepping_seconds += step_start.elapsed().as_secs_f64();

            if self.config.sample_stride > 0 && state.step_index % self.config.sample_stride == 0 {
                let sample_start = Instant::now();
                let snapshot = state.snapshot();
                consumer(&snapshot);
                samples_taken += 1;
                sampling_seconds += sample_start.elapsed().as_secs_f64();
            }

            if self.config.verbose && state.step_index % 100 == 0 {
                println!(
                    "  step {} / {}: t = {:.2} h, max |eta| = {:.4} m",
                    state.step_index,
                    self.config.max_steps,
                    state.time / 3600.0,
                    state.eta.max_abs()
                );
            }
        }

        Ok(RunReport {
            final_time: state.time,
            steps_completed: state.step_index,
            samples_taken,
            stepping_seconds,
            sampling_seconds,
            wall_seconds: wall_start.elapsed().as_secs_f64(),
        })
    }
}
