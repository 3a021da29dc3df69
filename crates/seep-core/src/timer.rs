//! Report-step timer and the run report returned by the time stepper.

use std::io::{self, Write};

/// Walks the schedule's report steps.
///
/// Built from the deck's report-step lengths and the restart step; the
/// time stepper advances it once per completed report step.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatorTimer {
    step_lengths: Vec<f64>,
    current_step: usize,
    elapsed: f64,
}

impl SimulatorTimer {
    /// Create a timer positioned at `start_step` (clamped to the schedule).
    pub fn new(step_lengths: Vec<f64>, start_step: usize) -> Self {
        let current_step = start_step.min(step_lengths.len());
        let elapsed = step_lengths[..current_step].iter().sum();
        Self {
            step_lengths,
            current_step,
            elapsed,
        }
    }

    /// Index of the report step about to be simulated.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Total number of report steps in the schedule.
    pub fn num_steps(&self) -> usize {
        self.step_lengths.len()
    }

    /// Whether every report step has been simulated.
    pub fn done(&self) -> bool {
        self.current_step >= self.step_lengths.len()
    }

    /// Length in seconds of the current report step.
    pub fn current_step_length(&self) -> Option<f64> {
        self.step_lengths.get(self.current_step).copied()
    }

    /// Simulated time in seconds at the start of the current step.
    pub fn simulation_time(&self) -> f64 {
        self.elapsed
    }

    /// Total schedule length in seconds.
    pub fn total_time(&self) -> f64 {
        self.step_lengths.iter().sum()
    }

    /// Move past the current report step.
    pub fn advance(&mut self) {
        if let Some(len) = self.current_step_length() {
            self.elapsed += len;
            self.current_step += 1;
        }
    }
}

/// Summary of a completed run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulatorReport {
    /// Wall-clock seconds spent in the run.
    pub total_time: f64,
    /// Wall-clock seconds spent inside the solvers.
    pub solver_time: f64,
    /// Report steps completed.
    pub report_steps: usize,
    /// Nonlinear iterations over the whole run.
    pub newton_iterations: u64,
    /// Linear iterations over the whole run.
    pub linear_iterations: u64,
}

impl SimulatorReport {
    /// Write the report in the `walltime.txt` format.
    pub fn write_param<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "Total time taken (seconds):  {:.6}", self.total_time)?;
        writeln!(out, "Solver time (seconds):       {:.6}", self.solver_time)?;
        writeln!(out, "Report steps:                {}", self.report_steps)?;
        writeln!(out, "Overall Newton Iterations:   {}", self.newton_iterations)?;
        writeln!(out, "Overall Linear Iterations:   {}", self.linear_iterations)?;
        Ok(())
    }

    /// Multi-line human-readable summary for the run log.
    pub fn summary(&self) -> String {
        format!(
            "Total time (seconds):         {:.3}\n\
             Solver time (seconds):        {:.3}\n\
             Report steps:                 {}\n\
             Overall Newton iterations:    {}\n\
             Overall linear iterations:    {}",
            self.total_time,
            self.solver_time,
            self.report_steps,
            self.newton_iterations,
            self.linear_iterations,
        )
    }
}
