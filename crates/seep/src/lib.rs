//! Seep: a driver for porous-media flow simulations.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Seep sub-crates, plus the `seep` command-line binary.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use seep::prelude::*;
//!
//! let mut driver = PipelineDriver::new(ReferenceBackend::new());
//! let code = driver.execute(["CASE.DATA", "output_dir=out"]);
//! std::process::exit(code);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `seep-core` | Topology, severities, state, collaborator traits, errors |
//! | [`config`] | `seep-config` | Parameters, case resolution, output layout |
//! | [`log`] | `seep-log` | Log backends, limits, parallel log merging |
//! | [`init`] | `seep-init` | Initial state strategies |
//! | [`engine`] | `seep-engine` | The staged pipeline driver and diagnostics |
//! | [`reference`] | `seep-reference` | Keyword deck, Cartesian grid, and a reference backend |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and errors (`seep-core`).
///
/// Contains [`types::ProcessTopology`], the severity classes, the
/// [`types::ReservoirState`], and the collaborator traits
/// ([`types::Deck`], [`types::Grid`], [`types::PropertyModel`]).
pub use seep_core as types;

/// Run parameters and output layout (`seep-config`).
pub use seep_config as config;

/// Logging backends and parallel log merging (`seep-log`).
///
/// [`log::LoggingContext`] owns the backends for one run.
pub use seep_log as log;

/// Initial state construction (`seep-init`).
pub use seep_init as init;

/// The simulation pipeline (`seep-engine`).
///
/// [`engine::PipelineDriver`] runs every stage against an
/// [`engine::Backend`].
pub use seep_engine as engine;

/// Reference collaborators (`seep-reference`).
pub use seep_reference as reference;

/// Common imports for typical Seep usage.
///
/// ```rust
/// use seep::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use seep_core::{
        Deck, Grid, LinearSolver, OutputWriter, PhaseUsage, ProcessTopology, PropertyModel,
        ReservoirState, Severity, SimulatorReport, TimeStepper,
    };

    // Errors
    pub use seep_core::{InitError, SimulationError, TopologyError};
    pub use seep_config::ConfigError;

    // Config
    pub use seep_config::{ConfigResolver, OutputLayout, ResolvedConfig};

    // Initialization
    pub use seep_init::{InitOptions, InitStrategy, StateInitializer};

    // Engine
    pub use seep_engine::{
        Backend, Console, DriverError, DriverOptions, PipelineDriver, RunOutcome, RunStatus,
    };

    // Reference backend
    pub use seep_reference::{ReferenceBackend, ReferenceOptions};
}
