/// Tunable parameters for a single agent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Seed for the agent's random source.
    pub seed: u64,
}

impl AgentConfig {
    pub const DEFAULT_SEED: u64 = 0x5eed_0f_6a_7e;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}
