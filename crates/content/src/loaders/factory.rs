//! Content factory for loading graphs and settings from a data directory.

use std::path::{Path, PathBuf};

use behavior_graph::Graph;

use crate::loaders::{ConfigLoader, GraphLoader, LoadResult};
use crate::{Registry, SimConfig};

/// Content factory that loads all content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── graphs/
///     ├── villager.ron
///     └── guard.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const GRAPHS_DIR: &'static str = "graphs";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load simulation configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<SimConfig> {
        ConfigLoader::load(&self.data_dir.join(Self::CONFIG_FILE))
    }

    /// Like [`load_config`](Self::load_config), but a missing file yields defaults.
    pub fn load_config_or_default(&self) -> LoadResult<SimConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("{} not found, using default config", path.display());
            return Ok(SimConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Path of `graphs/{name}.ron`.
    pub fn graph_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(Self::GRAPHS_DIR)
            .join(format!("{}.ron", name))
    }

    /// Load and build the graph in `graphs/{name}.ron`.
    pub fn load_graph<C: 'static>(
        &self,
        name: &str,
        registry: &Registry<C>,
    ) -> LoadResult<Graph<C>> {
        GraphLoader::load(&self.graph_path(name), registry)
    }

    /// Names of every `.ron` file under `graphs/`, sorted.
    pub fn list_graphs(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join(Self::GRAPHS_DIR);
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
