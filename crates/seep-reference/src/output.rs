//! Plain-text result files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use seep_core::{Grid, OutputWriter, PropertyModel, ReservoirState, SimulationError, SimulatorTimer};

/// Writes `<base>.INIT` once and `<base>.X<step>` every `interval` report
/// steps. A disabled writer accepts every call and writes nothing.
#[derive(Clone, Debug)]
pub struct TextOutputWriter {
    dir: PathBuf,
    base: String,
    interval: usize,
    enabled: bool,
    written: Vec<PathBuf>,
}

impl TextOutputWriter {
    /// A writer into `dir` naming files after `base`. An interval of 0 is
    /// treated as 1.
    pub fn new(
        dir: impl Into<PathBuf>,
        base: impl Into<String>,
        interval: usize,
        enabled: bool,
    ) -> Self {
        Self {
            dir: dir.into(),
            base: base.into(),
            interval: interval.max(1),
            enabled,
            written: Vec::new(),
        }
    }

    /// Path of the initial output file.
    pub fn initial_path(&self) -> PathBuf {
        self.dir.join(format!("{}.INIT", self.base))
    }

    /// Path of the output file for `report_step`.
    pub fn step_path(&self, report_step: usize) -> PathBuf {
        self.dir.join(format!("{}.X{report_step:04}", self.base))
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_file<F>(&mut self, path: PathBuf, body: F) -> Result<(), SimulationError>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let result = File::create(&path).and_then(|file| {
            let mut out = BufWriter::new(file);
            body(&mut out)?;
            out.flush()
        });
        result.map_err(|error| output_error(&path, error))?;
        self.written.push(path);
        Ok(())
    }
}

fn output_error(path: &Path, error: io::Error) -> SimulationError {
    SimulationError::collaborator("output writer", format!("{}: {error}", path.display()))
}

impl OutputWriter for TextOutputWriter {
    fn write_initial(
        &mut self,
        grid: &dyn Grid,
        properties: &dyn PropertyModel,
    ) -> Result<(), SimulationError> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.initial_path();
        self.write_file(path, |out| {
            writeln!(out, "cells {}", grid.num_cells())?;
            writeln!(out, "faces {}", grid.num_faces())?;
            let phases: Vec<String> = grid
                .phase_usage()
                .phases()
                .iter()
                .map(|p| p.to_string())
                .collect();
            writeln!(out, "phases {}", phases.join(" "))?;
            writeln!(out, "relperm_tables {}", properties.relperm_tables().len())?;
            writeln!(out, "depth")?;
            for cell in 0..grid.num_cells() {
                writeln!(out, "{}", grid.cell_depth(cell))?;
            }
            Ok(())
        })
    }

    fn write_step(
        &mut self,
        timer: &SimulatorTimer,
        state: &ReservoirState,
    ) -> Result<(), SimulationError> {
        let step = timer.current_step();
        if !self.enabled || step % self.interval != 0 {
            return Ok(());
        }
        let path = self.step_path(step);
        self.write_file(path, |out| {
            writeln!(out, "report_step {step}")?;
            writeln!(out, "time {}", timer.simulation_time())?;
            writeln!(out, "pressure saturation...")?;
            for cell in 0..state.num_cells() {
                write!(out, "{}", state.pressure()[cell])?;
                for s in state.cell_saturation(cell) {
                    write!(out, " {s}")?;
                }
                writeln!(out)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use seep_core::PhaseUsage;

    use crate::{CartesianGrid, ConstantProperties};

    fn grid() -> CartesianGrid {
        CartesianGrid::new([2, 1, 1], 100.0, 10.0, PhaseUsage::black_oil())
    }

    #[test]
    fn initial_file_lists_depths() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TextOutputWriter::new(dir.path(), "CASE", 1, true);
        let props = ConstantProperties::new(PhaseUsage::black_oil(), true);
        writer.write_initial(&grid(), &props).unwrap();
        let text = fs::read_to_string(dir.path().join("CASE.INIT")).unwrap();
        assert!(text.starts_with("cells 2\nfaces 1\nphases water oil gas\n"));
        assert!(text.ends_with("depth\n105\n105\n"));
    }

    #[test]
    fn steps_follow_interval() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TextOutputWriter::new(dir.path(), "CASE", 2, true);
        let mut timer = SimulatorTimer::new(vec![1.0; 4], 0);
        let state = ReservoirState::new(2, 1, 3);
        while !timer.done() {
            timer.advance();
            writer.write_step(&timer, &state).unwrap();
        }
        assert_eq!(writer.written(), &[writer.step_path(2), writer.step_path(4)]);
        assert!(dir.path().join("CASE.X0004").exists());
    }

    #[test]
    fn disabled_writer_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = TextOutputWriter::new(dir.path(), "CASE", 1, false);
        let props = ConstantProperties::new(PhaseUsage::black_oil(), true);
        writer.write_initial(&grid(), &props).unwrap();
        assert!(writer.written().is_empty());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unwritable_directory_is_collaborator_error() {
        let mut writer = TextOutputWriter::new("/nonexistent/out", "CASE", 1, true);
        let props = ConstantProperties::new(PhaseUsage::black_oil(), true);
        match writer.write_initial(&grid(), &props) {
            Err(SimulationError::Collaborator { collaborator, .. }) => {
                assert_eq!(collaborator, "output writer");
            }
            other => panic!("expected Collaborator error, got {other:?}"),
        }
    }
}
