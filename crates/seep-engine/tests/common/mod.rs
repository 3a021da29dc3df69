//! Shared mock backend for pipeline tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use seep_config::ResolvedConfig;
use seep_core::{
    Deck, Grid, InitialStateRecords, LinearSolver, OutputWriter, ProcessTopology, PropertyModel,
    SimulationError, TimeStepper,
};
use seep_engine::{Backend, Console, DriverOptions, OutputOptions, PropertyOptions, StepperParts};
use seep_test_utils::fixtures::{CountingStepper, FailingStepper, NamedSolver, RecordingWriter};
use seep_test_utils::{MockDeck, MockGrid, MockProperties, SharedBuffer};

/// Which stepper the backend hands out.
#[derive(Clone, Debug)]
pub enum StepperKind {
    Counting(CountingStepper),
    Failing(FailingStepper),
}

/// What the time stepper was built with.
#[derive(Clone, Debug, PartialEq)]
pub struct StepperSeen {
    pub gravity: f64,
    pub thread_count: usize,
    pub cells: usize,
}

/// Hands out mocks and records every factory call by name.
#[derive(Clone, Debug)]
pub struct MockBackend {
    pub calls: Arc<Mutex<Vec<&'static str>>>,
    pub deck: MockDeck,
    pub grid: MockGrid,
    pub properties: MockProperties,
    pub writer: RecordingWriter,
    pub stepper: StepperKind,
    pub fail_grid: bool,
    pub output_options: Arc<Mutex<Option<OutputOptions>>>,
    pub stepper_seen: Arc<Mutex<Option<StepperSeen>>>,
}

impl MockBackend {
    /// Three-cell black-oil column with restart records and three report steps.
    pub fn new() -> Self {
        let records = InitialStateRecords {
            pressure: Some(vec![Some(2.0e7); 3]),
            water_saturation: Some(vec![0.2; 3]),
            gas_saturation: Some(vec![0.0; 3]),
            dissolved_gas_ratio: None,
        };
        Self {
            calls: Arc::default(),
            deck: MockDeck::new()
                .with_initial_state(records)
                .with_report_steps(vec![86_400.0; 3]),
            grid: MockGrid::column(&[1000.0, 1010.0, 1020.0]),
            properties: MockProperties::black_oil(),
            writer: RecordingWriter::new(),
            stepper: StepperKind::Counting(CountingStepper::new()),
            fail_grid: false,
            output_options: Arc::default(),
            stepper_seen: Arc::default(),
        }
    }

    pub fn with_deck(mut self, deck: MockDeck) -> Self {
        self.deck = deck;
        self
    }

    pub fn with_stepper(mut self, stepper: StepperKind) -> Self {
        self.stepper = stepper;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Runs of the counting stepper; 0 for the failing one.
    pub fn runs(&self) -> usize {
        match &self.stepper {
            StepperKind::Counting(stepper) => stepper.runs(),
            StepperKind::Failing(_) => 0,
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for MockBackend {
    fn load_case(&mut self, _deck_filename: &Path) -> Result<Box<dyn Deck>, SimulationError> {
        self.record("load_case");
        Ok(Box::new(self.deck.clone()))
    }

    fn build_grid(
        &mut self,
        _deck: &dyn Deck,
        _topology: &ProcessTopology,
    ) -> Result<Box<dyn Grid>, SimulationError> {
        self.record("build_grid");
        if self.fail_grid {
            return Err(SimulationError::collaborator("grid", "partitioning failed"));
        }
        Ok(Box::new(self.grid.clone()))
    }

    fn build_properties(
        &mut self,
        _deck: &dyn Deck,
        _grid: &dyn Grid,
        _options: &PropertyOptions,
    ) -> Result<Box<dyn PropertyModel>, SimulationError> {
        self.record("build_properties");
        Ok(Box::new(self.properties.clone()))
    }

    fn build_initial_writer(
        &mut self,
        _deck: &dyn Deck,
        _grid: &dyn Grid,
        _options: &OutputOptions,
    ) -> Result<Box<dyn OutputWriter>, SimulationError> {
        self.record("build_initial_writer");
        Ok(Box::new(self.writer.clone()))
    }

    fn build_output_writer(
        &mut self,
        _deck: &dyn Deck,
        _grid: &dyn Grid,
        options: &OutputOptions,
        initial: Option<Box<dyn OutputWriter>>,
    ) -> Result<Box<dyn OutputWriter>, SimulationError> {
        self.record("build_output_writer");
        *self.output_options.lock().unwrap() = Some(options.clone());
        Ok(initial.unwrap_or_else(|| Box::new(self.writer.clone())))
    }

    fn build_linear_solver(
        &mut self,
        _config: &ResolvedConfig,
    ) -> Result<Box<dyn LinearSolver>, SimulationError> {
        self.record("build_linear_solver");
        Ok(Box::new(NamedSolver::default()))
    }

    fn build_time_stepper(
        &mut self,
        parts: StepperParts,
    ) -> Result<Box<dyn TimeStepper>, SimulationError> {
        self.record("build_time_stepper");
        *self.stepper_seen.lock().unwrap() = Some(StepperSeen {
            gravity: parts.gravity,
            thread_count: parts.thread_count,
            cells: parts.grid.num_cells(),
        });
        Ok(match &self.stepper {
            StepperKind::Counting(stepper) => Box::new(stepper.clone()),
            StepperKind::Failing(stepper) => Box::new(stepper.clone()),
        })
    }
}

/// A case file plus an output directory inside a temporary directory.
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub case: PathBuf,
    pub out: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let case = dir.path().join("CASE.DATA");
        fs::write(&case, "RUNSPEC\n").unwrap();
        let out = dir.path().join("out");
        Self { dir, case, out }
    }

    /// The case path plus `output_dir`, followed by `extra`.
    pub fn args(&self, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            self.case.display().to_string(),
            format!("output_dir={}", self.out.display()),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.out.join(name)).unwrap()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.out.join(name).exists()
    }
}

/// Serial (or given) topology with console output captured.
pub fn options(topology: ProcessTopology) -> (DriverOptions, SharedBuffer) {
    let console = SharedBuffer::new();
    let options = DriverOptions {
        topology: Some(topology),
        console: Console::capture(console.clone()),
    };
    (options, console)
}
