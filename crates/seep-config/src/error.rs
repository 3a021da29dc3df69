//! Configuration errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving parameters and preparing output.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed or ambiguous command-line input.
    #[error("argument error: {reason}")]
    Argument {
        /// What was wrong with the arguments.
        reason: String,
    },
    /// No file matching the requested input case exists.
    #[error("cannot find input case {}", .case.display())]
    DeckResolution {
        /// The case path as given on the command line.
        case: PathBuf,
    },
    /// A parameter file could not be read or parsed.
    #[error("parameter file {}: {reason}", .path.display())]
    ParamFile {
        /// The parameter file.
        path: PathBuf,
        /// What went wrong, including the line number if known.
        reason: String,
    },
    /// A parameter value could not be converted to the requested type.
    #[error("parameter {key}={value:?} is not a valid {expected}")]
    InvalidValue {
        /// Parameter name.
        key: String,
        /// Raw value.
        value: String,
        /// Name of the expected type.
        expected: &'static str,
    },
    /// The output directory could not be created.
    #[error("creating output directory {} failed: {source}", .path.display())]
    OutputDirectory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The parameter snapshot could not be written.
    #[error("writing {} failed: {source}", .path.display())]
    Snapshot {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub(crate) fn argument(reason: impl Into<String>) -> Self {
        Self::Argument {
            reason: reason.into(),
        }
    }
}
