//! Command implementations for graph-sim.
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod inspect;
mod run;

pub use inspect::Inspect;
pub use run::Run;

use std::env;
use std::path::PathBuf;

/// Resolves the data directory: flag, then `GRAPH_SIM_DATA_DIR`, then `./data`.
pub(crate) fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| env::var_os("GRAPH_SIM_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data"))
}

pub(crate) fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
