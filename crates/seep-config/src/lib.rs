//! Run parameters, input case resolution, and output layout.
//!
//! - [`ParameterGroup`] holds `key=value` parameters from the command line
//!   and parameter files, and remembers which keys were consulted.
//! - [`ConfigResolver`] turns the raw argument list into a
//!   [`ResolvedConfig`] naming exactly one input case.
//! - [`OutputLayout`] decides whether this process writes files, prepares
//!   the output directory, and snapshots the resolved parameters.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod output;
pub mod param;
pub mod resolve;

pub use error::ConfigError;
pub use output::OutputLayout;
pub use param::{FromParam, ParameterGroup};
pub use resolve::{resolve_case, ConfigResolver, ResolvedConfig};
