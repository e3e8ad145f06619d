//! Simulation settings.

use behavior_graph::AgentConfig;
use serde::{Deserialize, Serialize};

/// Settings for a headless simulation run.
///
/// Every field has a default, so an empty `config.toml` is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Base seed; agent `i` uses `seed + i`.
    pub seed: u64,
    pub ticks: u32,
    pub agents: u32,
    /// Graph to run when none is given on the command line.
    pub graph: Option<String>,
}

impl SimConfig {
    pub const DEFAULT_TICKS: u32 = 100;
    pub const DEFAULT_AGENTS: u32 = 1;

    /// Per-agent configuration for the agent at `index`.
    pub fn agent_config(&self, index: u32) -> AgentConfig {
        AgentConfig::with_seed(self.seed.wrapping_add(u64::from(index)))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: AgentConfig::DEFAULT_SEED,
            ticks: Self::DEFAULT_TICKS,
            agents: Self::DEFAULT_AGENTS,
            graph: None,
        }
    }
}
