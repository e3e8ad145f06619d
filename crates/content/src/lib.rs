//! Data-driven behaviour graph content.
//!
//! This crate turns RON/TOML data files into runnable graphs:
//! - Graph definitions ([`GraphDef`]) naming states and conditions by kind
//! - A kind [`Registry`] resolving those names into concrete objects
//! - Simulation settings ([`SimConfig`])
//!
//! Definitions never reference host types; hosts register their own kinds
//! before loading.

pub mod config;
pub mod defs;
pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use config::SimConfig;
pub use defs::{ConditionDef, ConnectionDef, GraphDef, NodeDef, Param, Params, StateDef};
pub use registry::Registry;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, GraphLoader};

/// Common result type for content operations.
pub type LoadResult<T> = anyhow::Result<T>;
