//! Content loaders for reading graph data from files.
//!
//! Graphs are RON ([`GraphDef`](crate::GraphDef)); settings are TOML
//! ([`SimConfig`](crate::SimConfig)).

pub mod config;
pub mod factory;
pub mod graph;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use graph::GraphLoader;

use std::path::Path;

pub use crate::LoadResult;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
