//! Core types and traits for the Seep simulation driver.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! process topology, the reservoir state handed to the time stepper, message
//! severities, error types, and the narrow traits through which the driver
//! talks to its external collaborators (deck, grid, property model, linear
//! solver, output writer, time stepper).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod phase;
pub mod severity;
pub mod state;
pub mod timer;
pub mod topology;
pub mod traits;

pub use error::{InitError, SimulationError, TopologyError};
pub use phase::{Phase, PhaseUsage};
pub use severity::{DeckMessage, MessageLimits, Severity, SeverityMask, SourceLocation};
pub use state::{HydrocarbonState, ReservoirState};
pub use timer::{SimulatorReport, SimulatorTimer};
pub use topology::ProcessTopology;
pub use traits::{
    Deck, EquilRecord, Grid, InitialStateRecords, LinearSolver, OutputWriter, PropertyModel,
    RelpermTable, TimeStepper,
};

/// Standard gravity in m/s², used when no `gravity` override is given.
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Pascals per bar.
pub const BARSA: f64 = 1.0e5;
