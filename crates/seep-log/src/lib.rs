//! Rank-aware logging for the Seep driver.
//!
//! Each process writes its own log files; ranks other than 0 add a
//! `.<rank>` suffix when the run is distributed so processes never share a
//! file. After the run, the output rank folds those fragments into the
//! canonical files with [`merge_log_fragments`].
//!
//! The log is an explicit [`LoggingContext`] value owned by the driver.
//! Dropping it closes every backend.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod context;
pub mod error;
pub mod format;
pub mod limiter;
pub mod merge;
pub mod naming;

pub use backend::{Destination, LogBackend};
pub use context::{LoggingContext, StreamTarget};
pub use error::LogError;
pub use format::MessageFormatter;
pub use limiter::{LimitDecision, MessageLimiter};
pub use merge::{merge_log_fragments, merge_parallel_logs, MergeReport};
pub use naming::{log_base_name, LogFileNames};
