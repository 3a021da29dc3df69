//! Logging errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening, closing, or merging log files.
#[derive(Debug, Error)]
pub enum LogError {
    /// A log file could not be created.
    #[error("cannot open log file {}: {source}", .path.display())]
    Open {
        /// The log file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A backend with this name is already registered.
    #[error("log backend {name} already exists")]
    DuplicateBackend {
        /// Backend name.
        name: String,
    },
    /// Flushing or closing a backend failed.
    #[error("closing log backend {name} failed: {source}")]
    Close {
        /// Backend name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Reading, appending, or removing a fragment failed during the merge.
    #[error("merging log fragment {} failed: {source}", .path.display())]
    Merge {
        /// The file being processed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
