//! Graph definition loader.

use std::path::Path;

use anyhow::Context;
use behavior_graph::Graph;

use crate::loaders::{LoadResult, read_file};
use crate::{GraphDef, Registry};

/// Loads graph definitions from RON and builds them through a [`Registry`].
pub struct GraphLoader;

impl GraphLoader {
    /// Read a [`GraphDef`] without building it.
    pub fn load_def(path: &Path) -> LoadResult<GraphDef> {
        let content = read_file(path)?;
        Self::parse_def(&content)
            .with_context(|| format!("graph file {}", path.display()))
    }

    /// Parse a [`GraphDef`] from RON text.
    pub fn parse_def(content: &str) -> LoadResult<GraphDef> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse graph RON: {}", e))
    }

    /// Load and build a graph file.
    pub fn load<C: 'static>(path: &Path, registry: &Registry<C>) -> LoadResult<Graph<C>> {
        let def = Self::load_def(path)?;
        registry
            .build_graph(&def)
            .with_context(|| format!("graph file {}", path.display()))
    }

    /// Parse and build a graph from RON text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str<C: 'static>(content: &str, registry: &Registry<C>) -> LoadResult<Graph<C>> {
        let def = Self::parse_def(content)?;
        registry.build_graph(&def)
    }
}
