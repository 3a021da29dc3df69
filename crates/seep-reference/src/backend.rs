//! The reference collaborator factory.

use std::path::Path;

use seep_config::ResolvedConfig;
use seep_core::{
    Deck, Grid, LinearSolver, OutputWriter, PhaseUsage, ProcessTopology, PropertyModel,
    SimulationError, TimeStepper,
};
use seep_engine::{Backend, OutputOptions, PropertyOptions, StepperParts};
use seep_log::log_base_name;

use crate::deck::KeywordDeck;
use crate::grid::CartesianGrid;
use crate::output::TextOutputWriter;
use crate::properties::ConstantProperties;
use crate::stepper::{ReferenceSolver, ReportStepper};

/// Geometry the deck reader does not provide.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceOptions {
    /// Depth of the top face of the grid, in metres.
    pub top_depth: f64,
    /// Thickness of every layer, in metres.
    pub layer_thickness: f64,
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            top_depth: 2000.0,
            layer_thickness: 10.0,
        }
    }
}

/// What the backend remembers about the loaded case.
#[derive(Clone, Debug)]
struct CaseInfo {
    base: String,
    dims: Option<[usize; 3]>,
    phases: PhaseUsage,
}

/// Builds the reference collaborators.
#[derive(Clone, Debug, Default)]
pub struct ReferenceBackend {
    options: ReferenceOptions,
    case: Option<CaseInfo>,
}

impl ReferenceBackend {
    /// A backend with default geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend with explicit geometry.
    pub fn with_options(options: ReferenceOptions) -> Self {
        Self {
            options,
            case: None,
        }
    }

    fn case(&self, collaborator: &str) -> Result<&CaseInfo, SimulationError> {
        self.case
            .as_ref()
            .ok_or_else(|| SimulationError::collaborator(collaborator, "no case loaded"))
    }
}

impl Backend for ReferenceBackend {
    fn load_case(&mut self, deck_filename: &Path) -> Result<Box<dyn Deck>, SimulationError> {
        let deck = KeywordDeck::load(deck_filename)?;
        self.case = Some(CaseInfo {
            base: log_base_name(deck_filename),
            dims: deck.dims(),
            phases: deck.phase_usage().clone(),
        });
        Ok(Box::new(deck))
    }

    fn build_grid(
        &mut self,
        _deck: &dyn Deck,
        topology: &ProcessTopology,
    ) -> Result<Box<dyn Grid>, SimulationError> {
        let case = self.case("grid")?;
        let dims = case
            .dims
            .ok_or_else(|| SimulationError::collaborator("grid", "the deck has no usable DIMENS"))?;
        if case.phases.num_phases() == 0 {
            return Err(SimulationError::collaborator(
                "grid",
                "the deck enables none of WATER, OIL, GAS",
            ));
        }
        if topology.must_distribute() {
            tracing::warn!(
                size = topology.size(),
                "reference grid is not partitioned; every rank holds the whole box"
            );
        }
        Ok(Box::new(CartesianGrid::new(
            dims,
            self.options.top_depth,
            self.options.layer_thickness,
            case.phases.clone(),
        )))
    }

    fn build_properties(
        &mut self,
        _deck: &dyn Deck,
        grid: &dyn Grid,
        options: &PropertyOptions,
    ) -> Result<Box<dyn PropertyModel>, SimulationError> {
        Ok(Box::new(ConstantProperties::new(
            grid.phase_usage().clone(),
            options.use_local_perm,
        )))
    }

    fn build_initial_writer(
        &mut self,
        _deck: &dyn Deck,
        _grid: &dyn Grid,
        options: &OutputOptions,
    ) -> Result<Box<dyn OutputWriter>, SimulationError> {
        let base = self.case("output writer")?.base.clone();
        Ok(Box::new(TextOutputWriter::new(
            &options.output_dir,
            base,
            options.output_interval.unwrap_or(1),
            options.output_to_files,
        )))
    }

    fn build_output_writer(
        &mut self,
        deck: &dyn Deck,
        grid: &dyn Grid,
        options: &OutputOptions,
        initial: Option<Box<dyn OutputWriter>>,
    ) -> Result<Box<dyn OutputWriter>, SimulationError> {
        match initial {
            Some(writer) => Ok(writer),
            None => self.build_initial_writer(deck, grid, options),
        }
    }

    fn build_linear_solver(
        &mut self,
        config: &ResolvedConfig,
    ) -> Result<Box<dyn LinearSolver>, SimulationError> {
        let solver = ReferenceSolver::from_config(config)
            .map_err(|error| SimulationError::collaborator("linear solver", error))?;
        Ok(Box::new(solver))
    }

    fn build_time_stepper(
        &mut self,
        parts: StepperParts,
    ) -> Result<Box<dyn TimeStepper>, SimulationError> {
        Ok(Box::new(ReportStepper::new(parts)))
    }
}
