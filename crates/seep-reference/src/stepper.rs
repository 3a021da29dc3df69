//! A time stepper without physics, and a solver that only has a name.

use std::time::Instant;

use seep_config::{ConfigError, ResolvedConfig};
use seep_core::{
    LinearSolver, ReservoirState, SimulationError, SimulatorReport, SimulatorTimer, TimeStepper,
};
use seep_engine::StepperParts;

/// A linear solver identified by the `linear_solver` parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceSolver {
    name: String,
}

impl ReferenceSolver {
    /// Solver name used when `linear_solver` is not given.
    pub const DEFAULT_NAME: &'static str = "identity";

    /// A solver called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Read the solver name from the run parameters.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        let name: String = config.get_or("linear_solver", Self::DEFAULT_NAME.to_string())?;
        Ok(Self::new(name))
    }
}

impl LinearSolver for ReferenceSolver {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Walks every remaining report step, leaving the state unchanged, and
/// hands each completed step to the output writer.
#[derive(Debug)]
pub struct ReportStepper {
    parts: StepperParts,
}

impl ReportStepper {
    /// A stepper over `parts`.
    pub fn new(parts: StepperParts) -> Self {
        Self { parts }
    }
}

impl TimeStepper for ReportStepper {
    fn run(
        &mut self,
        timer: &mut SimulatorTimer,
        state: &mut ReservoirState,
    ) -> Result<SimulatorReport, SimulationError> {
        let started = Instant::now();
        if state.num_cells() != self.parts.grid.num_cells() {
            return Err(SimulationError::StepFailed {
                report_step: timer.current_step(),
                reason: format!(
                    "state has {} cells but the grid has {}",
                    state.num_cells(),
                    self.parts.grid.num_cells()
                ),
            });
        }
        let _span = tracing::info_span!(
            "run",
            steps = timer.num_steps(),
            solver = self.parts.linear_solver.name(),
            threads = self.parts.thread_count,
        )
        .entered();

        let mut report = SimulatorReport::default();
        while !timer.done() {
            timer.advance();
            report.report_steps += 1;
            self.parts.output_writer.write_step(timer, state)?;
            tracing::debug!(
                step = timer.current_step(),
                time = timer.simulation_time(),
                "report step done"
            );
        }
        report.total_time = started.elapsed().as_secs_f64();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use seep_config::ConfigResolver;
    use seep_core::PhaseUsage;
    use seep_test_utils::fixtures::RecordingWriter;

    use crate::{CartesianGrid, ConstantProperties};

    fn parts(cells: usize, writer: RecordingWriter) -> StepperParts {
        StepperParts {
            grid: Arc::new(CartesianGrid::new([cells, 1, 1], 0.0, 1.0, PhaseUsage::black_oil())),
            properties: Arc::new(ConstantProperties::new(PhaseUsage::black_oil(), true)),
            linear_solver: Box::new(ReferenceSolver::new("identity")),
            output_writer: Box::new(writer),
            gravity: 9.80665,
            thread_count: 1,
        }
    }

    #[test]
    fn walks_remaining_steps_and_writes_each() {
        let writer = RecordingWriter::new();
        let mut stepper = ReportStepper::new(parts(2, writer.clone()));
        let mut timer = SimulatorTimer::new(vec![1.0; 4], 1);
        let mut state = ReservoirState::new(2, 1, 3);
        let report = stepper.run(&mut timer, &mut state).unwrap();
        assert_eq!(report.report_steps, 3);
        assert!(timer.done());
        assert_eq!(writer.events(), vec!["step:2", "step:3", "step:4"]);
    }

    #[test]
    fn mismatched_state_fails() {
        let mut stepper = ReportStepper::new(parts(2, RecordingWriter::new()));
        let mut timer = SimulatorTimer::new(vec![1.0], 0);
        let mut state = ReservoirState::new(5, 0, 3);
        assert!(matches!(
            stepper.run(&mut timer, &mut state),
            Err(SimulationError::StepFailed { report_step: 0, .. })
        ));
    }

    #[test]
    fn solver_name_from_parameters() {
        let config =
            ConfigResolver::resolve(["deck_filename=X.DATA", "linear_solver=cpr"]).unwrap();
        assert_eq!(ReferenceSolver::from_config(&config).unwrap().name(), "cpr");
        let config = ConfigResolver::resolve(["deck_filename=X.DATA"]).unwrap();
        assert_eq!(
            ReferenceSolver::from_config(&config).unwrap().name(),
            ReferenceSolver::DEFAULT_NAME
        );
    }
}
