//! The Seep pipeline driver.
//!
//! [`PipelineDriver`] runs the setup stages in a fixed order, each one
//! needing every earlier stage to have succeeded:
//!
//! topology → config → output layout → framework → logging → deck messages
//! → grid and properties → diagnostics → state initialization → initial
//! output → output writer → linear solver → time stepper → run → teardown.
//!
//! External collaborators are built through the [`Backend`] factory trait.
//! Errors from every stage are gathered in [`DriverError`] and handled in
//! exactly one place.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod console;
pub mod control;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod metrics;
pub mod stage;

pub use backend::{Backend, OutputOptions, PropertyOptions, StepperParts};
pub use console::Console;
pub use control::RunControl;
pub use diagnostics::{DiagnosticsRunner, Finding};
pub use driver::{DriverOptions, PipelineDriver, RunOutcome, RunStatus};
pub use error::DriverError;
pub use metrics::StageMetrics;
pub use stage::Stage;
