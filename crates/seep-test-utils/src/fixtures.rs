//! Reusable stepper, writer, and solver fixtures.
//!
//! - [`CountingStepper`]: walks every report step and counts its runs.
//! - [`FailingStepper`]: fails at a fixed report step.
//! - [`RecordingWriter`]: records every write call.
//! - [`NamedSolver`]: a linear solver that only has a name.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use seep_core::{
    Grid, LinearSolver, OutputWriter, PropertyModel, ReservoirState, SimulationError,
    SimulatorReport, SimulatorTimer, TimeStepper,
};

/// Advances the timer through every remaining step without touching the
/// state. Clones share the run counter.
#[derive(Clone, Debug, Default)]
pub struct CountingStepper {
    runs: Arc<AtomicUsize>,
}

impl CountingStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`TimeStepper::run`] was called on any clone.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl TimeStepper for CountingStepper {
    fn run(
        &mut self,
        timer: &mut SimulatorTimer,
        _state: &mut ReservoirState,
    ) -> Result<SimulatorReport, SimulationError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let mut report = SimulatorReport::default();
        while !timer.done() {
            timer.advance();
            report.report_steps += 1;
            report.newton_iterations += 2;
            report.linear_iterations += 10;
        }
        Ok(report)
    }
}

/// Fails once the timer reaches `fail_at`.
#[derive(Clone, Debug)]
pub struct FailingStepper {
    pub fail_at: usize,
}

impl FailingStepper {
    pub fn new(fail_at: usize) -> Self {
        Self { fail_at }
    }
}

impl TimeStepper for FailingStepper {
    fn run(
        &mut self,
        timer: &mut SimulatorTimer,
        _state: &mut ReservoirState,
    ) -> Result<SimulatorReport, SimulationError> {
        while !timer.done() {
            if timer.current_step() >= self.fail_at {
                return Err(SimulationError::StepFailed {
                    report_step: timer.current_step(),
                    reason: "nonlinear solver did not converge".into(),
                });
            }
            timer.advance();
        }
        Ok(SimulatorReport::default())
    }
}

/// Records `"initial:<cells>"` and `"step:<n>"` events. Clones share the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingWriter {
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl OutputWriter for RecordingWriter {
    fn write_initial(
        &mut self,
        grid: &dyn Grid,
        _properties: &dyn PropertyModel,
    ) -> Result<(), SimulationError> {
        self.record(format!("initial:{}", grid.num_cells()));
        Ok(())
    }

    fn write_step(
        &mut self,
        timer: &SimulatorTimer,
        _state: &ReservoirState,
    ) -> Result<(), SimulationError> {
        self.record(format!("step:{}", timer.current_step()));
        Ok(())
    }
}

/// A linear solver identified only by name.
#[derive(Clone, Debug)]
pub struct NamedSolver(pub String);

impl Default for NamedSolver {
    fn default() -> Self {
        Self("mock-ilu0".into())
    }
}

impl LinearSolver for NamedSolver {
    fn name(&self) -> &str {
        &self.0
    }
}
