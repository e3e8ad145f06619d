//! Utility-scored state machine for tick-driven game agents.
//!
//! A behaviour graph is a set of states (nodes) joined by scored transitions
//! (connections). An agent walks the graph one external tick at a time: when
//! its current state has ended, every outgoing connection is scored and the
//! best one above zero wins.
//!
//! - **Tick driven**: the host calls [`Agent::tick`] once per frame or step
//! - **One transition per tick**: re-entries always defer to the next tick
//! - **Shared graphs**: many agents walk one `Arc<Graph<C>>`
//! - **Permissive**: stale end signals and malformed graphs never panic
//!
//! # Architecture
//!
//! - [`Condition`]: scores an agent ([`RandomRange`], [`SuccessCheck`], [`Constant`])
//! - [`Connection`]: combines condition scores with a [`Combine`] policy
//! - [`Node`]: a [`State`] plus its connections and [`RepeatMode`]
//! - [`Graph`]: owns nodes, designates the entry and "any" nodes
//! - [`Agent`]: current node, pause/end flags, the tick loop
//! - [`Tween`]: explicit per-tick interpolation for hosts

pub mod agent;
pub mod builder;
pub mod condition;
pub mod config;
pub mod connection;
pub mod graph;
pub mod node;
pub mod outcome;
pub mod rng;
pub mod state;
pub mod states;
pub mod tween;

// Re-export core types for ergonomic API
pub use agent::{Agent, AgentPhase, AgentSnapshot};
pub use condition::{Condition, Constant, Evaluation, FnCondition, RandomRange, SuccessCheck};
pub use config::AgentConfig;
pub use connection::{Combine, Connection};
pub use graph::{Graph, GraphError, GraphId};
pub use node::{Node, NodeId, RepeatMode};
pub use outcome::Outcome;
pub use rng::{Pcg32, RandomSource};
pub use state::{State, StateContext};
pub use states::{FnState, Idle, Instant, Wait};
pub use tween::{Easing, Tween};
