//! Pipeline stages in execution order.

use std::fmt;

/// One step of the driver pipeline.
///
/// Variants are declared in execution order, so `Ord` follows the
/// pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Rank, size, and thread-count discovery.
    Topology,
    /// Argument classification and case resolution.
    Config,
    /// Output directory and parameter snapshot.
    OutputLayout,
    /// Case loading and run-control overrides.
    Framework,
    /// Opening the log backends.
    Logging,
    /// Forwarding deck diagnostics to the log.
    Messages,
    /// Grid and property model construction.
    GridAndProperties,
    /// Relative-permeability sanity checks.
    Diagnostics,
    /// Building the initial reservoir state.
    StateInit,
    /// Writing the static initial output.
    WriteInitial,
    /// Output writer construction.
    OutputWriter,
    /// Linear solver construction.
    LinearSolver,
    /// Time stepper construction.
    TimeStepper,
    /// The simulation run itself.
    Run,
    /// Closing the log backends and merging fragments.
    Teardown,
}

impl Stage {
    /// Every stage in execution order.
    pub const ALL: [Stage; 15] = [
        Stage::Topology,
        Stage::Config,
        Stage::OutputLayout,
        Stage::Framework,
        Stage::Logging,
        Stage::Messages,
        Stage::GridAndProperties,
        Stage::Diagnostics,
        Stage::StateInit,
        Stage::WriteInitial,
        Stage::OutputWriter,
        Stage::LinearSolver,
        Stage::TimeStepper,
        Stage::Run,
        Stage::Teardown,
    ];

    /// Short lowercase name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Topology => "topology",
            Self::Config => "config",
            Self::OutputLayout => "output layout",
            Self::Framework => "framework",
            Self::Logging => "logging",
            Self::Messages => "deck messages",
            Self::GridAndProperties => "grid and properties",
            Self::Diagnostics => "diagnostics",
            Self::StateInit => "state initialization",
            Self::WriteInitial => "initial output",
            Self::OutputWriter => "output writer",
            Self::LinearSolver => "linear solver",
            Self::TimeStepper => "time stepper",
            Self::Run => "run",
            Self::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
