//! Headless behaviour graph simulator.
//!
//! Loads a graph from a data directory, ticks a handful of agents over it and
//! logs every transition.
//!
//! ```text
//! graph-sim run --data-dir crates/sim/data --graph villager --ticks 200 --agents 4
//! graph-sim inspect villager
//! ```

mod commands;
mod world;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use commands::{Inspect, Run};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Headless behaviour graph simulator
#[derive(Parser)]
#[command(name = "graph-sim")]
#[command(about = "Tick agents over behaviour graphs loaded from data files", long_about = None)]
#[command(version)]
struct Cli {
    /// Also write logs to graph-sim.log in this directory
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run agents over a graph and log their transitions
    Run(Run),

    /// Print a graph's nodes and connections
    Inspect(Inspect),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for GRAPH_SIM_DATA_DIR and GRAPH_SIM_SEED)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_dir.as_deref())?;

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Inspect(cmd) => cmd.execute(),
    }
}

/// Logs to stderr, and to a file when `log_dir` is given.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "graph-sim.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = log_dir {
        tracing::info!("Log file: {}/graph-sim.log", dir.display());
    }
    Ok(guard)
}
