//! Narrow interfaces to the driver's external collaborators.
//!
//! The driver sequences these collaborators but never looks inside them:
//! deck parsing, grid partitioning, fluid and rock property evaluation,
//! linear algebra, and the time-stepping physics all live behind these
//! traits.

use smallvec::SmallVec;

use crate::error::SimulationError;
use crate::phase::{Phase, PhaseUsage};
use crate::severity::{DeckMessage, MessageLimits};
use crate::state::ReservoirState;
use crate::timer::{SimulatorReport, SimulatorTimer};

// ── Deck records ───────────────────────────────────────────────────

/// One `EQUIL` record: hydrostatic equilibrium data for a region.
///
/// Depths in metres (positive downwards), pressures in Pa.
#[derive(Clone, Debug, PartialEq)]
pub struct EquilRecord {
    /// Depth of the datum.
    pub datum_depth: f64,
    /// Pressure at the datum.
    pub datum_pressure: f64,
    /// Depth of the water-oil contact.
    pub water_oil_contact: f64,
    /// Oil-water capillary pressure at the water-oil contact.
    pub water_oil_pc: f64,
    /// Depth of the gas-oil contact.
    pub gas_oil_contact: f64,
    /// Gas-oil capillary pressure at the gas-oil contact.
    pub gas_oil_pc: f64,
}

/// Per-cell initial-state records read directly from the deck.
///
/// `pressure` entries may be `None` for cells the deck leaves unspecified;
/// those are completed hydrostatically during initialization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InitialStateRecords {
    /// `PRESSURE` per cell, in Pa.
    pub pressure: Option<Vec<Option<f64>>>,
    /// `SWAT` per cell.
    pub water_saturation: Option<Vec<f64>>,
    /// `SGAS` per cell.
    pub gas_saturation: Option<Vec<f64>>,
    /// `RS` per cell (dissolved gas-oil ratio).
    pub dissolved_gas_ratio: Option<Vec<f64>>,
}

/// A relative-permeability table for one phase in one saturation region.
#[derive(Clone, Debug, PartialEq)]
pub struct RelpermTable {
    /// Zero-based saturation region.
    pub region: usize,
    /// Phase whose relative permeability is tabulated.
    pub phase: Phase,
    /// Saturation column.
    pub saturation: Vec<f64>,
    /// Relative permeability column.
    pub kr: Vec<f64>,
}

// ── Collaborators ──────────────────────────────────────────────────

/// The parsed simulation case.
pub trait Deck {
    /// Whether the deck contains `keyword`.
    fn has_keyword(&self, keyword: &str) -> bool;

    /// Diagnostics collected while parsing.
    fn messages(&self) -> &[DeckMessage];

    /// Print limits from the case's message policy.
    fn message_limits(&self) -> MessageLimits {
        MessageLimits::default()
    }

    /// Whether the case asks for initialization only (`NOSIM`).
    fn init_only(&self) -> bool {
        self.has_keyword("NOSIM")
    }

    /// Report-step lengths in seconds.
    fn report_steps(&self) -> &[f64];

    /// Report step the run restarts from.
    fn restart_step(&self) -> usize {
        0
    }

    /// `EQUIL` records, one per equilibration region.
    fn equilibration_records(&self) -> &[EquilRecord];

    /// Explicit per-cell initial state, if the deck carries one.
    fn initial_state(&self) -> Option<&InitialStateRecords>;
}

/// The (possibly partitioned) computational grid as seen by this process.
pub trait Grid {
    /// Number of cells owned by this process.
    fn num_cells(&self) -> usize;

    /// Number of faces.
    fn num_faces(&self) -> usize;

    /// Depth of the cell centroid in metres (positive downwards).
    fn cell_depth(&self, cell: usize) -> f64;

    /// Zero-based equilibration region of `cell`.
    fn equilibration_region(&self, _cell: usize) -> usize {
        0
    }

    /// Active phases.
    fn phase_usage(&self) -> &PhaseUsage;
}

/// Rock and fluid property evaluation.
pub trait PropertyModel {
    /// Number of phases the model evaluates.
    fn num_phases(&self) -> usize;

    /// Reservoir densities in kg/m³ per active phase for `cell`.
    fn densities(&self, cell: usize) -> SmallVec<[f64; 3]>;

    /// Inverse formation volume factors per active phase at `pressure`.
    fn inverse_fvf(&self, cell: usize, pressure: f64) -> SmallVec<[f64; 3]>;

    /// Capillary pressure at `saturation`, in the same cell-major layout.
    fn capillary_pressure(&self, saturation: &[f64]) -> Vec<f64>;

    /// Rescale the capillary pressure curves so they reproduce `capillary_pressure`
    /// at `saturation` (`SWATINIT`).
    fn apply_swatinit_scaling(&mut self, saturation: &[f64], capillary_pressure: &[f64]);

    /// Relative-permeability tables, for diagnostics.
    fn relperm_tables(&self) -> &[RelpermTable];
}

/// Linear solver used inside the time stepper.
pub trait LinearSolver {
    /// Short name for the run log.
    fn name(&self) -> &str;
}

/// Writes simulation results to disk.
pub trait OutputWriter {
    /// Write the static initial output (grid geometry, properties).
    fn write_initial(
        &mut self,
        grid: &dyn Grid,
        properties: &dyn PropertyModel,
    ) -> Result<(), SimulationError>;

    /// Write the state at the end of a report step.
    fn write_step(
        &mut self,
        timer: &SimulatorTimer,
        state: &ReservoirState,
    ) -> Result<(), SimulationError>;
}

/// The time-stepping engine.
pub trait TimeStepper {
    /// Advance `state` through every remaining report step of `timer`.
    fn run(
        &mut self,
        timer: &mut SimulatorTimer,
        state: &mut ReservoirState,
    ) -> Result<SimulatorReport, SimulationError>;
}
