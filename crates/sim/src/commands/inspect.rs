//! Print the nodes and connections of a graph, or list available graphs.

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use behavior_content::{ContentFactory, GraphLoader};
use behavior_graph::{Graph, RepeatMode};
use clap::Parser;
use console::style;

use super::resolve_data_dir;
use crate::world::{self, World};

/// Inspect graph definitions
#[derive(Parser)]
pub struct Inspect {
    /// Graph to inspect; lists every graph when omitted
    #[arg(value_name = "NAME")]
    graph: Option<String>,

    /// Data directory holding config.toml and graphs/ (env: GRAPH_SIM_DATA_DIR)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Print the raw definition as JSON instead of the built graph
    #[arg(long)]
    json: bool,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let factory = ContentFactory::new(resolve_data_dir(self.data_dir.clone()));
        print!("{}", self.render(&factory)?);
        Ok(())
    }

    fn render(&self, factory: &ContentFactory) -> Result<String> {
        let Some(name) = &self.graph else {
            return render_list(factory);
        };

        if self.json {
            let def = GraphLoader::load_def(&factory.graph_path(name))?;
            return Ok(format!("{}\n", serde_json::to_string_pretty(&def)?));
        }

        let graph = factory
            .load_graph(name, &world::registry())
            .with_context(|| format!("Failed to load graph '{}'", name))?;
        render_graph(&graph)
    }
}

fn render_list(factory: &ContentFactory) -> Result<String> {
    let names = factory.list_graphs()?;
    if names.is_empty() {
        return Ok(format!("No graphs in {}\n", factory.data_dir().display()));
    }
    let mut out = String::new();
    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(out)
}

fn render_graph(graph: &Graph<World>) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} ({} nodes)",
        style(graph.name()).cyan().bold(),
        graph.len()
    )?;

    for node in graph {
        let mut tags = Vec::new();
        if graph.entry() == Some(node.id()) {
            tags.push("entry");
        }
        if graph.any() == Some(node.id()) {
            tags.push("any");
        }
        match node.mode() {
            RepeatMode::RunOnce => {}
            RepeatMode::Loop => tags.push("loop"),
            RepeatMode::RestartGraph => tags.push("restart"),
        }

        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };
        writeln!(out, "  {}{}", style(node.name()).bold(), style(tags).dim())?;

        for connection in node.connections() {
            let target = graph
                .node(connection.target())
                .map_or("?", |target| target.name());
            writeln!(
                out,
                "    -> {:<12} {:?} of {} condition(s)",
                target,
                connection.combine(),
                connection.conditions().len()
            )?;
        }
    }
    Ok(out)
}
