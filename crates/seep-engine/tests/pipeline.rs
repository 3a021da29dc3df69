//! PipelineDriver end to end over a mock backend.

mod common;

use std::fs;

use common::{options, MockBackend, StepperKind, StepperSeen, Workspace};
use seep_config::ConfigError;
use seep_core::{
    DeckMessage, Phase, ProcessTopology, RelpermTable, Severity, SimulationError,
    STANDARD_GRAVITY,
};
use seep_engine::{DriverError, PipelineDriver, RunStatus, Stage};
use seep_log::LogError;
use seep_test_utils::fixtures::FailingStepper;
use seep_test_utils::MockProperties;

const ALL_FACTORY_CALLS: [&str; 7] = [
    "load_case",
    "build_grid",
    "build_properties",
    "build_initial_writer",
    "build_output_writer",
    "build_linear_solver",
    "build_time_stepper",
];

fn serial() -> ProcessTopology {
    ProcessTopology::new(0, 1, 2).unwrap()
}

// ── Full run ───────────────────────────────────────────────────────

#[test]
fn full_run_executes_every_stage_in_order() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let (opts, console) = options(serial());
    let mut driver = PipelineDriver::with_options(backend.clone(), opts);

    let outcome = driver.run(ws.args(&[])).unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.metrics.stages(), Stage::ALL.to_vec());
    assert_eq!(backend.calls(), ALL_FACTORY_CALLS.to_vec());
    assert_eq!(backend.runs(), 1);
    assert_eq!(outcome.report.as_ref().map(|r| r.report_steps), Some(3));
    assert_eq!(backend.writer.events(), vec!["initial:3".to_string()]);

    assert!(ws.exists("simulation.param"));
    assert!(ws.read("walltime.txt").contains("Report steps:                3"));
    assert!(ws.read("CASE.PRT").contains("Initial state from deck initial state"));
    assert!(console.contents().contains("This is seep (version"));
    assert!(console.contents().contains("Using 2 threads."));
}

#[test]
fn stepper_receives_gravity_and_threads() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let (opts, _) = options(serial());
    PipelineDriver::with_options(backend.clone(), opts)
        .run(ws.args(&["output_interval=4"]))
        .unwrap();
    assert_eq!(
        backend.stepper_seen.lock().unwrap().clone(),
        Some(StepperSeen {
            gravity: STANDARD_GRAVITY,
            thread_count: 2,
            cells: 3,
        })
    );
    let output = backend.output_options.lock().unwrap().clone().unwrap();
    assert_eq!(output.output_interval, Some(4));
    assert!(output.output_to_files);
}

#[test]
fn nograv_zeroes_gravity() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let backend = backend.clone().with_deck(backend.deck.clone().with_keyword("NOGRAV"));
    let (opts, _) = options(serial());
    let outcome = PipelineDriver::with_options(backend.clone(), opts)
        .run(ws.args(&["gravity=3.7"]))
        .unwrap();
    let seen = backend.stepper_seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.gravity, 0.0);
    assert_eq!(outcome.unused, vec!["gravity".to_string()]);
}

#[test]
fn unused_parameters_are_reported() {
    let ws = Workspace::new();
    let (opts, console) = options(serial());
    let outcome = PipelineDriver::with_options(MockBackend::new(), opts)
        .run(ws.args(&["lienar_solver=ilu0"]))
        .unwrap();
    assert_eq!(outcome.unused, vec!["lienar_solver".to_string()]);
    assert!(console.contents().contains("lienar_solver=ilu0"));
}

#[test]
fn deck_messages_and_diagnostics_reach_the_log() {
    let ws = Workspace::new();
    let mut backend = MockBackend::new();
    backend.deck = backend
        .deck
        .clone()
        .with_message(DeckMessage::new(Severity::Warning, "unsupported keyword GRIDOPTS"));
    backend.properties = MockProperties::black_oil().with_tables(vec![RelpermTable {
        region: 0,
        phase: Phase::Water,
        saturation: vec![0.2],
        kr: vec![0.0],
    }]);
    let (opts, _) = options(serial());
    PipelineDriver::with_options(backend, opts)
        .run(ws.args(&[]))
        .unwrap();
    let prt = ws.read("CASE.PRT");
    assert!(prt.contains("unsupported keyword GRIDOPTS"));
    assert!(prt.contains("water relperm table, region 1: needs at least two rows"));
}

#[test]
fn output_disabled_writes_no_files_but_logs() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let (opts, _) = options(serial());
    PipelineDriver::with_options(backend.clone(), opts)
        .run(ws.args(&["output=false"]))
        .unwrap();
    assert!(!ws.exists("simulation.param"));
    assert!(!ws.exists("walltime.txt"));
    assert!(ws.exists("CASE.PRT"));
    assert!(!backend.calls().contains(&"build_initial_writer"));
}

#[test]
fn output_ecl_off_skips_initial_output() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let (opts, _) = options(serial());
    PipelineDriver::with_options(backend.clone(), opts)
        .run(ws.args(&["output_ecl=false"]))
        .unwrap();
    assert!(backend.writer.events().is_empty());
    assert!(ws.exists("walltime.txt"));
}

// ── Init-only ──────────────────────────────────────────────────────

#[test]
fn nosim_deck_stops_before_run() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let backend = backend.clone().with_deck(backend.deck.clone().with_keyword("NOSIM"));
    let (opts, console) = options(serial());
    let mut driver = PipelineDriver::with_options(backend.clone(), opts);

    let outcome = driver.run(ws.args(&[])).unwrap();
    assert_eq!(outcome.status, RunStatus::InitOnly);
    assert!(outcome.report.is_none());
    assert!(!outcome.metrics.stages().contains(&Stage::Run));
    assert_eq!(outcome.metrics.stages().last(), Some(&Stage::Teardown));
    assert_eq!(backend.calls(), ALL_FACTORY_CALLS.to_vec());
    assert_eq!(backend.runs(), 0);
    assert!(!ws.exists("walltime.txt"));
    assert!(console.contents().contains("Simulation turned off"));

    assert_eq!(driver.execute(ws.args(&[])), 0);
}

#[test]
fn nosim_parameter_overrides_deck() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let backend = backend.clone().with_deck(backend.deck.clone().with_keyword("NOSIM"));
    let (opts, _) = options(serial());
    let outcome = PipelineDriver::with_options(backend.clone(), opts)
        .run(ws.args(&["nosim=false"]))
        .unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(backend.runs(), 1);

    let (opts, _) = options(serial());
    let outcome = PipelineDriver::with_options(MockBackend::new(), opts)
        .run(ws.args(&["nosim=true"]))
        .unwrap();
    assert_eq!(outcome.status, RunStatus::InitOnly);
}

// ── Failures ───────────────────────────────────────────────────────

#[test]
fn two_cases_fail_before_anything_else() {
    let ws = Workspace::new();
    let other = ws.dir.path().join("OTHER.DATA");
    fs::write(&other, "").unwrap();
    let backend = MockBackend::new();
    let (opts, console) = options(serial());
    let mut driver = PipelineDriver::with_options(backend.clone(), opts);

    let mut args = ws.args(&[]);
    args.push(other.display().to_string());
    match driver.run(args.clone()) {
        Err(DriverError::Config(ConfigError::Argument { reason })) => {
            assert!(reason.contains("at most one input case"));
        }
        other => panic!("expected Argument error, got {other:?}"),
    }
    assert!(backend.calls().is_empty());
    assert!(!ws.out.exists());
    assert!(console.contents().contains("Error: argument error"));
    assert_eq!(driver.execute(args), 1);
}

#[test]
fn no_case_is_a_usage_error() {
    let (opts, _) = options(serial());
    let mut driver = PipelineDriver::with_options(MockBackend::new(), opts);
    assert_eq!(driver.execute(Vec::<String>::new()), 1);
}

#[test]
fn stepper_failure_is_logged_and_exits_one() {
    let ws = Workspace::new();
    let backend = MockBackend::new().with_stepper(StepperKind::Failing(FailingStepper::new(1)));
    let (opts, console) = options(serial());
    let mut driver = PipelineDriver::with_options(backend, opts);

    match driver.run(ws.args(&[])) {
        Err(DriverError::Simulation(SimulationError::StepFailed { report_step, .. })) => {
            assert_eq!(report_step, 1);
        }
        other => panic!("expected StepFailed, got {other:?}"),
    }
    assert!(!ws.exists("walltime.txt"));
    assert!(ws.read("CASE.PRT").contains("Unrecoverable error in run"));
    assert!(console.contents().contains("Unrecoverable error in run"));
    assert_eq!(driver.execute(ws.args(&[])), 1);
}

#[test]
fn grid_failure_aborts_later_stages() {
    let ws = Workspace::new();
    let mut backend = MockBackend::new();
    backend.fail_grid = true;
    let (opts, _) = options(serial());
    let result = PipelineDriver::with_options(backend.clone(), opts).run(ws.args(&[]));
    assert!(matches!(result, Err(DriverError::Simulation(_))));
    assert_eq!(backend.calls(), vec!["load_case", "build_grid"]);
    assert!(ws.read("CASE.PRT").contains("Unrecoverable error in grid and properties"));
}

#[test]
fn missing_initial_state_is_invalid_deck_state() {
    let ws = Workspace::new();
    let backend = MockBackend::new().with_deck(seep_test_utils::MockDeck::new());
    let (opts, _) = options(serial());
    match PipelineDriver::with_options(backend.clone(), opts).run(ws.args(&[])) {
        Err(DriverError::Init(err)) => assert!(err.to_string().contains("PRESSURE")),
        other => panic!("expected Init error, got {other:?}"),
    }
    assert!(!backend.calls().contains(&"build_output_writer"));
}

// ── Distributed runs ───────────────────────────────────────────────

#[test]
fn non_output_rank_writes_fragments_only() {
    let ws = Workspace::new();
    let backend = MockBackend::new();
    let (opts, console) = options(ProcessTopology::new(2, 3, 1).unwrap());
    PipelineDriver::with_options(backend.clone(), opts)
        .run(ws.args(&[]))
        .unwrap();
    assert!(ws.exists("CASE.2.PRT"));
    assert!(ws.exists(".CASE.2.DEBUG"));
    assert!(!ws.exists("CASE.PRT"));
    assert!(!ws.exists("walltime.txt"));
    assert!(!ws.exists("simulation.param"));
    assert!(console.contents().is_empty());
    assert!(!backend.calls().contains(&"build_initial_writer"));
}

#[test]
fn output_rank_merges_fragments_after_run() {
    let ws = Workspace::new();
    let (opts, _) = options(ProcessTopology::new(1, 2, 1).unwrap());
    PipelineDriver::with_options(MockBackend::new(), opts)
        .run(ws.args(&[]))
        .unwrap();
    assert!(ws.exists("CASE.1.PRT"));

    let (opts, _) = options(ProcessTopology::new(0, 2, 1).unwrap());
    PipelineDriver::with_options(MockBackend::new(), opts)
        .run(ws.args(&[]))
        .unwrap();
    assert!(!ws.exists("CASE.1.PRT"));
    assert!(!ws.exists(".CASE.1.DEBUG"));
    let prt = ws.read("CASE.PRT");
    assert!(prt.contains("Log output of rank 1 (CASE.1.PRT)"));
}

#[test]
fn merge_failure_after_teardown_reaches_the_console() {
    let ws = Workspace::new();
    // A directory where rank 1's fragment should be cannot be read.
    fs::create_dir_all(ws.out.join("CASE.1.PRT")).unwrap();
    let (opts, console) = options(ProcessTopology::new(0, 2, 1).unwrap());
    match PipelineDriver::with_options(MockBackend::new(), opts).run(ws.args(&[])) {
        Err(DriverError::Log(LogError::Merge { path, .. })) => {
            assert!(path.ends_with("CASE.1.PRT"));
        }
        other => panic!("expected Merge error, got {other:?}"),
    }
    let out = console.contents();
    assert!(out.contains("Error: merging log fragment"), "console: {out}");
    assert!(!ws.read("CASE.PRT").contains("Unrecoverable"));
}
