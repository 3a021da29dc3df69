//! Per-stage timings for one pipeline run.

use crate::stage::Stage;

/// Wall-clock time spent in each stage that ran.
///
/// All durations are in microseconds. Stages appear in the order they
/// were entered; a skipped stage has no entry.
#[derive(Clone, Debug, Default)]
pub struct StageMetrics {
    /// Wall-clock time for the whole pipeline, in microseconds.
    pub total_us: u64,
    /// Per-stage execution times: `(stage, microseconds)`.
    pub stage_us: Vec<(Stage, u64)>,
}

impl StageMetrics {
    /// Stages that ran, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.stage_us.iter().map(|(stage, _)| *stage).collect()
    }

    /// Time spent in `stage`, if it ran.
    pub fn stage(&self, stage: Stage) -> Option<u64> {
        self.stage_us
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, us)| *us)
    }
}
