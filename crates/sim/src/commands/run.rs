//! Run agents over a graph for a number of ticks.
//!
//! Every node change is logged at `info`; the final state of each agent is
//! printed as a summary or as JSON.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use behavior_content::{ContentFactory, SimConfig};
use behavior_graph::{Agent, AgentSnapshot, Graph, Node, NodeId};
use clap::Parser;
use console::style;
use serde::Serialize;

use super::{read_env, resolve_data_dir};
use crate::world::{self, World};

/// Run agents over a graph
#[derive(Parser)]
pub struct Run {
    /// Data directory holding config.toml and graphs/ (env: GRAPH_SIM_DATA_DIR)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Graph to run (defaults to `graph` in config.toml)
    #[arg(short, long, value_name = "NAME")]
    graph: Option<String>,

    /// Number of ticks to run
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Number of agents sharing the graph
    #[arg(short, long)]
    agents: Option<u32>,

    /// Base random seed (env: GRAPH_SIM_SEED)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One line per agent
    Summary,
    /// Full JSON report
    Json,
}

/// Final state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReport {
    pub index: u32,
    pub transitions: u32,
    pub snapshot: AgentSnapshot,
}

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub graph: String,
    pub ticks: u32,
    pub stock: u32,
    pub agents: Vec<AgentReport>,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let factory = ContentFactory::new(resolve_data_dir(self.data_dir.clone()));
        let config = self.resolve_config(&factory)?;

        let name = config
            .graph
            .clone()
            .context("No graph given: pass --graph or set `graph` in config.toml")?;
        let graph = factory
            .load_graph(&name, &world::registry())
            .with_context(|| format!("Failed to load graph '{}'", name))?;

        tracing::info!(
            "running '{}' with {} agent(s) for {} tick(s), seed {}",
            name,
            config.agents,
            config.ticks,
            config.seed
        );
        let report = simulate(Arc::new(graph), &config);

        match self.format {
            OutputFormat::Summary => print_summary(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }

    /// Config file values, overridden by environment, overridden by flags.
    fn resolve_config(&self, factory: &ContentFactory) -> Result<SimConfig> {
        let config = factory.load_config_or_default()?;
        Ok(self.apply_overrides(config, read_env("GRAPH_SIM_SEED")))
    }

    fn apply_overrides(&self, mut config: SimConfig, env_seed: Option<u64>) -> SimConfig {
        if let Some(seed) = self.seed.or(env_seed) {
            config.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if let Some(agents) = self.agents {
            config.agents = agents;
        }
        if let Some(graph) = &self.graph {
            config.graph = Some(graph.clone());
        }
        config
    }
}

/// Ticks `config.agents` agents over `graph` for `config.ticks` ticks.
pub fn simulate(graph: Arc<Graph<World>>, config: &SimConfig) -> Report {
    let mut world = World::default();
    let mut agents: Vec<(Agent<World>, u32)> = (0..config.agents)
        .map(|index| {
            let mut agent = Agent::new(&config.agent_config(index));
            agent.set_behaviour(Some(graph.clone()), &mut world);
            agent.restart(&mut world);
            (agent, 0)
        })
        .collect();

    for tick in 0..config.ticks {
        world.tick = u64::from(tick);
        for (index, (agent, transitions)) in (0..).zip(agents.iter_mut()) {
            world.agent = index;
            let before = agent.current();
            agent.tick(&mut world);
            let after = agent.current();
            if after != before {
                *transitions += 1;
                tracing::info!(
                    "tick {:>4} agent {}: {} -> {} (stock {})",
                    tick,
                    index,
                    node_name(&graph, before),
                    node_name(&graph, after),
                    world.stock
                );
            }
        }
    }

    Report {
        graph: graph.name().to_owned(),
        ticks: config.ticks,
        stock: world.stock,
        agents: (0..)
            .zip(agents)
            .map(|(index, (agent, transitions))| AgentReport {
                index,
                transitions,
                snapshot: agent.snapshot(),
            })
            .collect(),
    }
}

fn node_name(graph: &Graph<World>, id: Option<NodeId>) -> &str {
    id.and_then(|id| graph.node(id)).map_or("-", Node::name)
}

fn print_summary(report: &Report) {
    println!(
        "{} after {} ticks, stock {}",
        style(&report.graph).cyan().bold(),
        report.ticks,
        report.stock
    );
    for agent in &report.agents {
        let snapshot = &agent.snapshot;
        let outcome = format!("{:?}", snapshot.outcome);
        let outcome = if snapshot.outcome.is_success() {
            style(outcome).green()
        } else {
            style(outcome).red()
        };
        println!(
            "  agent {:<3} {:<12} {:>4} transitions  last {}{}",
            agent.index,
            snapshot.current.as_deref().unwrap_or("-"),
            agent.transitions,
            outcome,
            if snapshot.waiting {
                style(" (waiting)").yellow().to_string()
            } else {
                String::new()
            }
        );
    }
}
