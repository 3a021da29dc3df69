//! The factory through which the driver obtains its collaborators.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use seep_config::ResolvedConfig;
use seep_core::{
    Deck, Grid, LinearSolver, OutputWriter, ProcessTopology, PropertyModel, SimulationError,
    TimeStepper,
};

/// Options for property model construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyOptions {
    /// Use per-cell permeability rather than a region average (`use_local_perm`).
    pub use_local_perm: bool,
    /// Gravitational acceleration in m/s².
    pub gravity: f64,
}

/// Options for output writer construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputOptions {
    /// Whether this process writes files at all.
    pub output_to_files: bool,
    /// Directory for result files.
    pub output_dir: PathBuf,
    /// Restart write cadence override, in report steps.
    pub output_interval: Option<usize>,
}

/// Everything the time stepper is built from.
///
/// The grid and property model are shared with the output writer, so they
/// are reference counted from here on.
pub struct StepperParts {
    /// The grid as seen by this process.
    pub grid: Arc<dyn Grid>,
    /// The property model, after any `SWATINIT` rescaling.
    pub properties: Arc<dyn PropertyModel>,
    /// Linear solver for the stepper to use.
    pub linear_solver: Box<dyn LinearSolver>,
    /// Writer for per-step results.
    pub output_writer: Box<dyn OutputWriter>,
    /// Gravitational acceleration in m/s².
    pub gravity: f64,
    /// Thread-count hint for the stepper's parallel kernels.
    pub thread_count: usize,
}

impl std::fmt::Debug for StepperParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepperParts")
            .field("cells", &self.grid.num_cells())
            .field("linear_solver", &self.linear_solver.name())
            .field("gravity", &self.gravity)
            .field("thread_count", &self.thread_count)
            .finish_non_exhaustive()
    }
}

/// Builds the external collaborators, one method per pipeline stage.
///
/// The driver calls each method at most once per run, in declaration
/// order, and only after every earlier stage has succeeded.
pub trait Backend {
    /// Parse the input case.
    fn load_case(&mut self, deck_filename: &Path) -> Result<Box<dyn Deck>, SimulationError>;

    /// Build (and if needed partition) the grid.
    fn build_grid(
        &mut self,
        deck: &dyn Deck,
        topology: &ProcessTopology,
    ) -> Result<Box<dyn Grid>, SimulationError>;

    /// Build the rock and fluid property model.
    fn build_properties(
        &mut self,
        deck: &dyn Deck,
        grid: &dyn Grid,
        options: &PropertyOptions,
    ) -> Result<Box<dyn PropertyModel>, SimulationError>;

    /// Open the result files that receive the static initial output.
    ///
    /// Only called when this process writes files and `output_ecl` is on.
    fn build_initial_writer(
        &mut self,
        deck: &dyn Deck,
        grid: &dyn Grid,
        options: &OutputOptions,
    ) -> Result<Box<dyn OutputWriter>, SimulationError>;

    /// Build the per-step output writer, taking over the initial writer
    /// if one was opened.
    fn build_output_writer(
        &mut self,
        deck: &dyn Deck,
        grid: &dyn Grid,
        options: &OutputOptions,
        initial: Option<Box<dyn OutputWriter>>,
    ) -> Result<Box<dyn OutputWriter>, SimulationError>;

    /// Build the linear solver from the run parameters.
    fn build_linear_solver(
        &mut self,
        config: &ResolvedConfig,
    ) -> Result<Box<dyn LinearSolver>, SimulationError>;

    /// Build the time stepper.
    fn build_time_stepper(
        &mut self,
        parts: StepperParts,
    ) -> Result<Box<dyn TimeStepper>, SimulationError>;
}
