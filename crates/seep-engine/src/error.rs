//! The aggregate driver error.

use std::io;
use std::path::PathBuf;

use seep_config::ConfigError;
use seep_core::{InitError, SimulationError, TopologyError};
use seep_log::LogError;
use thiserror::Error;

/// Any error that aborts the pipeline.
///
/// Stage errors convert into this with `?`; nothing below the driver's
/// outer boundary recovers from them.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Rank/size discovery failed.
    #[error(transparent)]
    Topology(#[from] TopologyError),
    /// Arguments, parameter files, case resolution, or output preparation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Opening, closing, or merging log files.
    #[error(transparent)]
    Log(#[from] LogError),
    /// The deck records could not produce an initial state.
    #[error(transparent)]
    Init(#[from] InitError),
    /// An external collaborator failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    /// The run report could not be written.
    #[error("writing {} failed: {source}", .path.display())]
    Walltime {
        /// The report file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DriverError {
    /// Process exit status for this error.
    ///
    /// Every failure, usage errors included, exits with 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
