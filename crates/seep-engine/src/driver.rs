//! The pipeline driver and its single error boundary.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::time::Instant;

use seep_config::{ConfigResolver, OutputLayout, ResolvedConfig};
use seep_core::{
    Grid, ProcessTopology, PropertyModel, ReservoirState, Severity, SimulatorReport,
    SimulatorTimer, BARSA,
};
use seep_init::{InitOptions, StateInitializer};
use seep_log::{log_base_name, merge_parallel_logs, LoggingContext, StreamTarget};

use crate::backend::{Backend, OutputOptions, PropertyOptions, StepperParts};
use crate::console::Console;
use crate::control::RunControl;
use crate::diagnostics::DiagnosticsRunner;
use crate::error::DriverError;
use crate::metrics::StageMetrics;
use crate::stage::Stage;

/// File name of the run report inside the output directory.
pub const WALLTIME_FILE: &str = "walltime.txt";

const BANNER_WIDTH: usize = 70;

// ── Options and outcome ────────────────────────────────────────────

/// How the driver talks to its environment.
#[derive(Clone, Debug, Default)]
pub struct DriverOptions {
    /// Fixed topology; discovered from the launcher environment when `None`.
    pub topology: Option<ProcessTopology>,
    /// Destination of console output and the stream log.
    pub console: Console,
}

/// How a successful run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every stage ran, including the simulation.
    Completed,
    /// The run stage was skipped on request.
    InitOnly,
}

/// Result of a successful pipeline run.
#[derive(Debug)]
pub struct RunOutcome {
    /// How the run ended.
    pub status: RunStatus,
    /// The simulator report; `None` for init-only runs.
    pub report: Option<SimulatorReport>,
    /// The state after the run (or straight after initialization).
    pub state: ReservoirState,
    /// Parameters never consulted, in insertion order.
    pub unused: Vec<String>,
    /// Per-stage timings.
    pub metrics: StageMetrics,
}

// ── Session ────────────────────────────────────────────────────────

/// Whether the log backends are open.
///
/// Decides where the outer boundary reports a failure: through the log
/// while it is established, on the output rank's console before or after.
#[derive(Debug, Default)]
enum LogState {
    #[default]
    Pending,
    Established(LoggingContext),
    Closed,
}

/// Per-run bookkeeping that outlives a failing stage.
#[derive(Debug)]
struct Session {
    started: Instant,
    stage: Option<(Stage, Instant)>,
    metrics: StageMetrics,
    output_rank: bool,
    log: LogState,
}

impl Session {
    fn new() -> Self {
        Self {
            started: Instant::now(),
            stage: None,
            metrics: StageMetrics::default(),
            // Until the topology is known, failures are reported.
            output_rank: true,
            log: LogState::Pending,
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.close_stage();
        tracing::debug!(%stage, "entering stage");
        self.stage = Some((stage, Instant::now()));
    }

    fn close_stage(&mut self) {
        if let Some((stage, since)) = self.stage.take() {
            self.metrics.stage_us.push((stage, elapsed_us(since)));
        }
    }

    fn current(&self) -> Option<Stage> {
        self.stage.map(|(stage, _)| stage)
    }

    fn finish(&mut self) -> StageMetrics {
        self.close_stage();
        self.metrics.total_us = elapsed_us(self.started);
        std::mem::take(&mut self.metrics)
    }

    fn log(&mut self, severity: Severity, text: &str) {
        if let LogState::Established(log) = &mut self.log {
            log.log(severity, text);
        }
    }
}

fn elapsed_us(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}

// ── PipelineDriver ─────────────────────────────────────────────────

/// Runs every setup stage in order, then the simulation.
///
/// The first failing stage aborts the rest. Failures are reported once, by
/// [`run`](Self::run): through the log when it is open, otherwise on the
/// console of the output rank. Log backends are closed on every path; the
/// fragment merge only runs after a successful run.
#[derive(Debug)]
pub struct PipelineDriver<B> {
    backend: B,
    options: DriverOptions,
}

impl<B: Backend> PipelineDriver<B> {
    /// A driver using `backend` with default options.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, DriverOptions::default())
    }

    /// A driver using `backend` and explicit options.
    pub fn with_options(backend: B, options: DriverOptions) -> Self {
        Self { backend, options }
    }

    /// The collaborator factory.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run the pipeline and map the result to a process exit status.
    pub fn execute<I, S>(&mut self, args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.run(args) {
            Ok(_) => 0,
            Err(error) => error.exit_code(),
        }
    }

    /// Run the pipeline over `args` (without the program name).
    ///
    /// This is the only place errors are caught. The error is reported
    /// before it is returned.
    pub fn run<I, S>(&mut self, args: I) -> Result<RunOutcome, DriverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = Session::new();
        let result = self.run_stages(args, &mut session);
        if let Err(error) = &result {
            self.report_failure(&mut session, error);
        }
        // Dropping the session closes any open backends without merging.
        result
    }

    fn report_failure(&self, session: &mut Session, error: &DriverError) {
        let stage = session.current().map_or("startup", Stage::name);
        tracing::error!(stage, %error, "pipeline aborted");
        match &mut session.log {
            LogState::Established(log) => {
                log.error(&format!("Unrecoverable error in {stage}: {error}"));
            }
            LogState::Pending | LogState::Closed if session.output_rank => {
                self.options.console.print(&format!("Error: {error}"));
            }
            LogState::Pending | LogState::Closed => {}
        }
    }

    fn run_stages<I, S>(
        &mut self,
        args: I,
        session: &mut Session,
    ) -> Result<RunOutcome, DriverError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let console = self.options.console.clone();

        session.enter(Stage::Topology);
        let topology = match self.options.topology {
            Some(topology) => topology,
            None => ProcessTopology::discover()?,
        };
        session.output_rank = topology.is_output_rank();
        if topology.is_output_rank() {
            console.print(&banner(env!("CARGO_PKG_VERSION")));
            console.print(&thread_notice(&topology));
        }

        session.enter(Stage::Config);
        let config = ConfigResolver::resolve(args)?;

        session.enter(Stage::OutputLayout);
        let layout = OutputLayout::prepare(&config, &topology)?;

        session.enter(Stage::Framework);
        let deck = self.backend.load_case(config.deck_filename())?;
        let control = RunControl::resolve(&config, deck.as_ref())?;
        tracing::debug!(?control, "run control resolved");

        session.enter(Stage::Logging);
        let stream = if topology.is_output_rank() {
            console.stream_target()
        } else {
            StreamTarget::Disabled
        };
        let log = LoggingContext::setup(
            &topology,
            &layout,
            config.deck_filename(),
            deck.message_limits(),
            stream,
        )?;
        session.log = LogState::Established(log);
        session.log(
            Severity::Debug,
            &format!(
                "Case {} on rank {} of {}, {} threads",
                config.deck_filename().display(),
                topology.rank(),
                topology.size(),
                topology.thread_count(),
            ),
        );

        session.enter(Stage::Messages);
        if topology.is_output_rank() {
            for message in deck.messages() {
                if let LogState::Established(log) = &mut session.log {
                    log.deck_message(message);
                }
            }
        }

        session.enter(Stage::GridAndProperties);
        let grid = self.backend.build_grid(deck.as_ref(), &topology)?;
        let property_options = PropertyOptions {
            use_local_perm: config.get_or("use_local_perm", true)?,
            gravity: control.gravity,
        };
        let mut properties =
            self.backend
                .build_properties(deck.as_ref(), grid.as_ref(), &property_options)?;

        session.enter(Stage::Diagnostics);
        if topology.is_output_rank() {
            let findings = DiagnosticsRunner::new().run(properties.relperm_tables());
            for finding in &findings {
                session.log(finding.severity, &finding.to_string());
            }
            tracing::debug!(findings = findings.len(), "relperm diagnostics done");
        }

        session.enter(Stage::StateInit);
        let initializer = StateInitializer::new(init_options(&config, control.gravity)?);
        let strategy = initializer.strategy(deck.as_ref());
        let mut state = initializer.initialize(deck.as_ref(), grid.as_ref(), properties.as_mut())?;
        session.log(
            Severity::Info,
            &format!("Initial state from {strategy}, {} cells", state.num_cells()),
        );

        session.enter(Stage::WriteInitial);
        let output_options = OutputOptions {
            output_to_files: layout.output_to_files(),
            output_dir: layout.output_dir().to_path_buf(),
            output_interval: control.output_interval,
        };
        let output_ecl = config.get_or("output_ecl", true)?;
        let initial = if layout.output_to_files() && output_ecl {
            let mut writer =
                self.backend
                    .build_initial_writer(deck.as_ref(), grid.as_ref(), &output_options)?;
            writer.write_initial(grid.as_ref(), properties.as_ref())?;
            Some(writer)
        } else {
            None
        };

        session.enter(Stage::OutputWriter);
        let output_writer = self.backend.build_output_writer(
            deck.as_ref(),
            grid.as_ref(),
            &output_options,
            initial,
        )?;

        session.enter(Stage::LinearSolver);
        let linear_solver = self.backend.build_linear_solver(&config)?;
        session.log(
            Severity::Debug,
            &format!("Linear solver: {}", linear_solver.name()),
        );

        session.enter(Stage::TimeStepper);
        let grid: Arc<dyn Grid> = Arc::from(grid);
        let properties: Arc<dyn PropertyModel> = Arc::from(properties);
        let mut stepper = self.backend.build_time_stepper(StepperParts {
            grid,
            properties,
            linear_solver,
            output_writer,
            gravity: control.gravity,
            thread_count: topology.thread_count(),
        })?;

        let mut unused = Vec::new();
        let (status, report) = if control.init_only {
            if topology.is_output_rank() {
                console.print("\n\n================ Simulation turned off ===============\n");
            }
            (RunStatus::InitOnly, None)
        } else {
            session.enter(Stage::Run);
            session.log(
                Severity::Info,
                "\n\n================ Starting main simulation loop ===============\n",
            );
            let mut timer = SimulatorTimer::new(deck.report_steps().to_vec(), deck.restart_step());
            let started = Instant::now();
            let mut report = stepper.run(&mut timer, &mut state)?;
            if report.total_time == 0.0 {
                report.total_time = started.elapsed().as_secs_f64();
            }

            unused = config.unused().into_iter().map(String::from).collect();
            if topology.is_output_rank() {
                session.log(
                    Severity::Info,
                    &format!(
                        "\n\n================    End of simulation     ===============\n\n{}",
                        report.summary()
                    ),
                );
                if !unused.is_empty() {
                    console.print(&unused_report(&config));
                }
            }
            if layout.output_to_files() {
                let path = layout.path_for(WALLTIME_FILE);
                File::create(&path)
                    .and_then(|file| report.write_param(BufWriter::new(file)))
                    .map_err(|source| DriverError::Walltime {
                        path: path.clone(),
                        source,
                    })?;
            }
            (RunStatus::Completed, Some(report))
        };

        session.enter(Stage::Teardown);
        // Closing drains every backend even when one fails.
        let open = std::mem::replace(&mut session.log, LogState::Closed);
        if let LogState::Established(mut log) = open {
            log.remove_all_backends()?;
        }
        let base = log_base_name(config.deck_filename());
        let merged = merge_parallel_logs(&topology, layout.output_dir(), &base)?;
        tracing::debug!(
            merged = merged.merged,
            removed_empty = merged.removed_empty,
            "log fragments merged"
        );

        Ok(RunOutcome {
            status,
            report,
            state,
            unused,
            metrics: session.finish(),
        })
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// `ref_pressure` and `ref_z` only matter to the explicit strategy, so they
/// are consulted only when `init_saturation` is given.
fn init_options(config: &ResolvedConfig, gravity: f64) -> Result<InitOptions, DriverError> {
    let mut options = InitOptions {
        gravity,
        ..InitOptions::default()
    };
    options.init_saturation = config.get::<f64>("init_saturation")?;
    if options.init_saturation.is_some() {
        let ref_bar = config.get_or("ref_pressure", InitOptions::DEFAULT_REF_PRESSURE_BAR)?;
        options.ref_pressure = ref_bar * BARSA;
        options.ref_depth = config.get::<f64>("ref_z")?;
    }
    Ok(options)
}

/// The startup banner, boxed in asterisks.
fn banner(version: &str) -> String {
    let inner = BANNER_WIDTH - 2;
    let title = format!("This is seep (version {version})");
    let rule = "*".repeat(BANNER_WIDTH);
    let blank = format!("*{}*", " ".repeat(inner));
    format!("{rule}\n{blank}\n*{title:^inner$}*\n{blank}\n{rule}")
}

fn thread_notice(topology: &ProcessTopology) -> String {
    if topology.must_distribute() {
        format!(
            "Using {} threads on rank {}.",
            topology.thread_count(),
            topology.rank()
        )
    } else {
        format!("Using {} threads.", topology.thread_count())
    }
}

fn unused_report(config: &ResolvedConfig) -> String {
    let mut text =
        String::from("--------------------   Unused parameters:   --------------------\n");
    for key in config.unused() {
        let value = config.params().iter().find(|(k, _)| *k == key).map_or("", |(_, v)| v);
        text.push_str(&format!("    {key}={value}\n"));
    }
    text.push_str(&"-".repeat(64));
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_is_boxed_and_centred() {
        let text = banner("1.2.3");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.len() == BANNER_WIDTH));
        assert!(lines[2].contains("This is seep (version 1.2.3)"));
        assert!(lines[2].starts_with("*  ") && lines[2].ends_with("  *"));
    }

    #[test]
    fn thread_notice_names_rank_when_distributed() {
        let serial = ProcessTopology::new(0, 1, 4).unwrap();
        assert_eq!(thread_notice(&serial), "Using 4 threads.");
        let parallel = ProcessTopology::new(0, 3, 2).unwrap();
        assert_eq!(thread_notice(&parallel), "Using 2 threads on rank 0.");
    }

    #[test]
    fn init_options_from_parameters() {
        let config = ConfigResolver::resolve([
            "deck_filename=CASE.DATA",
            "init_saturation=0.3",
            "ref_pressure=200",
            "ref_z=1500",
        ])
        .unwrap();
        let options = init_options(&config, 9.0).unwrap();
        assert_eq!(options.init_saturation, Some(0.3));
        assert_eq!(options.ref_pressure, 200.0 * BARSA);
        assert_eq!(options.ref_depth, Some(1500.0));
        assert_eq!(options.gravity, 9.0);
    }

    #[test]
    fn reference_parameters_unused_without_init_saturation() {
        let config = ConfigResolver::resolve(["deck_filename=CASE.DATA", "ref_z=1500"]).unwrap();
        let options = init_options(&config, 9.0).unwrap();
        assert_eq!(options.init_saturation, None);
        assert_eq!(config.unused(), vec!["ref_z"]);
    }

    #[test]
    fn unused_report_lists_values() {
        let config = ConfigResolver::resolve(["deck_filename=CASE.DATA", "typo=1"]).unwrap();
        let text = unused_report(&config);
        assert!(text.contains("Unused parameters"));
        assert!(text.contains("    typo=1\n"));
    }
}
