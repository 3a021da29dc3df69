//! Reference collaborators for the Seep driver.
//!
//! Just enough of each external collaborator for the `seep` binary to run
//! a case end to end:
//!
//! - [`KeywordDeck`]: a keyword-scanning deck reader.
//! - [`CartesianGrid`]: a uniform box of cells.
//! - [`ConstantProperties`]: constant densities and volume factors with
//!   Corey relative permeabilities.
//! - [`ReportStepper`]: walks the report steps without any physics.
//! - [`TextOutputWriter`]: plain-text initial and per-step output.
//!
//! [`ReferenceBackend`] wires them into the driver's
//! [`Backend`](seep_engine::Backend) factory.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod deck;
pub mod grid;
pub mod output;
pub mod properties;
pub mod stepper;

pub use backend::{ReferenceBackend, ReferenceOptions};
pub use deck::KeywordDeck;
pub use grid::CartesianGrid;
pub use output::TextOutputWriter;
pub use properties::ConstantProperties;
pub use stepper::{ReferenceSolver, ReportStepper};
