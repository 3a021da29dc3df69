//! Error types shared across the Seep workspace.
//!
//! Organized by the stage that raises them: process topology discovery,
//! initial-state construction, and the external simulation collaborators.
//! Configuration and logging errors live in their own crates and are
//! aggregated by the driver.

use thiserror::Error;

/// Errors from [`ProcessTopology`](crate::ProcessTopology) discovery.
///
/// All topology errors are fatal: without a consistent rank/size pair the
/// process cannot name its log files or decide whether it owns the
/// canonical output.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A launcher variable held something other than a non-negative integer.
    #[error("launcher variable {var}={value:?} is not a non-negative integer")]
    InvalidLauncherValue {
        /// Name of the environment variable.
        var: String,
        /// The unparseable value.
        value: String,
    },
    /// Only one half of a rank/size variable pair was set.
    #[error("launcher variable {present} is set but {missing} is not")]
    IncompleteLauncherPair {
        /// The variable that was present.
        present: String,
        /// The variable that was expected alongside it.
        missing: String,
    },
    /// The launcher reported a world with zero processes.
    #[error("process count must be at least 1")]
    EmptyWorld,
    /// The reported rank is not smaller than the process count.
    #[error("rank {rank} is out of range for {size} processes")]
    RankOutOfRange {
        /// Rank reported by the launcher.
        rank: usize,
        /// Process count reported by the launcher.
        size: usize,
    },
}

/// Errors from initial-state construction.
///
/// Every variant belongs to the invalid-deck-state class: the selected
/// initialization strategy found missing or inconsistent records.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InitError {
    /// Generic inconsistency in the deck data.
    #[error("invalid deck state: {reason}")]
    InvalidDeckState {
        /// What was inconsistent.
        reason: String,
    },
    /// Grid phase usage and property model disagree on the phase count.
    #[error("invalid deck state: grid uses {grid} phases but the property model has {properties}")]
    PhaseCountMismatch {
        /// Active phases according to the grid's phase usage.
        grid: usize,
        /// Phases according to the property model.
        properties: usize,
    },
    /// Records required by the selected strategy are absent.
    #[error("invalid deck state: no {keyword} records")]
    MissingRecords {
        /// The keyword whose records were expected.
        keyword: &'static str,
    },
    /// A per-cell record has the wrong number of entries.
    #[error("invalid deck state: {keyword} has {found} entries, expected {expected}")]
    RecordLength {
        /// The offending keyword.
        keyword: &'static str,
        /// Number of entries found.
        found: usize,
        /// Number of entries expected (usually the cell count).
        expected: usize,
    },
    /// A cell refers to an equilibration region without a record.
    #[error("invalid deck state: cell {cell} is in equilibration region {region} but only {records} EQUIL records exist")]
    MissingRegion {
        /// Cell index.
        cell: usize,
        /// Zero-based region index.
        region: usize,
        /// Number of records available.
        records: usize,
    },
}

/// Errors surfaced by the external collaborators.
///
/// The driver never retries; any of these aborts the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// A collaborator could not be constructed or failed outside time stepping.
    #[error("{collaborator} failed: {reason}")]
    Collaborator {
        /// Which collaborator (deck, grid, output writer, ...).
        collaborator: String,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The time-stepping engine failed during the run.
    #[error("time stepping failed at report step {report_step}: {reason}")]
    StepFailed {
        /// Report step being simulated when the failure happened.
        report_step: usize,
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl SimulationError {
    /// Shorthand for [`SimulationError::Collaborator`].
    pub fn collaborator(collaborator: impl Into<String>, reason: impl ToString) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_mismatch_mentions_both_counts() {
        let msg = InitError::PhaseCountMismatch {
            grid: 3,
            properties: 2,
        }
        .to_string();
        assert!(msg.contains("invalid deck state"));
        assert!(msg.contains('3') && msg.contains('2'));
    }

    #[test]
    fn collaborator_shorthand_formats() {
        let err = SimulationError::collaborator("grid", "no DIMENS");
        assert_eq!(err.to_string(), "grid failed: no DIMENS");
    }

    #[test]
    fn rank_out_of_range_display() {
        let err = TopologyError::RankOutOfRange { rank: 4, size: 4 };
        assert_eq!(err.to_string(), "rank 4 is out of range for 4 processes");
    }
}
