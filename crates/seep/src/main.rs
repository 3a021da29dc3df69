//! The `seep` command-line simulator.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use seep::engine::PipelineDriver;
use seep::reference::ReferenceBackend;

/// Run a simulation case.
///
/// Inputs are the case file and any number of `key=value` parameters or
/// `.param` files, in any order.
#[derive(Debug, Parser)]
#[command(name = "seep", version, about)]
struct Cli {
    /// Case file, `key=value` overrides, and parameter files.
    #[arg(trailing_var_arg = true)]
    inputs: Vec<String>,
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .context("invalid RUST_LOG filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to install tracing subscriber")
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = init_tracing() {
        eprintln!("warning: {err:#}");
    }
    tracing::debug!(inputs = ?cli.inputs, "starting");
    let mut driver = PipelineDriver::new(ReferenceBackend::new());
    let code = driver.execute(cli.inputs);
    tracing::debug!(code, "finished");
    std::process::exit(code);
}
