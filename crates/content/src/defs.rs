//! Serializable graph definitions.
//!
//! A [`GraphDef`] names its states and conditions by string kind; the
//! [`Registry`](crate::Registry) resolves those kinds into concrete objects
//! when the graph is built, so definitions never depend on gameplay types.
//!
//! ```ron
//! GraphDef(
//!     name: "villager",
//!     entry: "rest",
//!     any: Some("alarm"),
//!     nodes: [
//!         NodeDef(name: "alarm", state: StateDef(kind: "idle"), connections: [
//!             ConnectionDef(target: "flee", conditions: [Custom(kind: "threatened")]),
//!         ]),
//!         NodeDef(
//!             name: "rest",
//!             state: StateDef(kind: "wait", params: {"ticks": 3}),
//!             connections: [
//!                 ConnectionDef(
//!                     target: "work",
//!                     combine: Max,
//!                     conditions: [Random(min: 0.0, max: 1.0)],
//!                 ),
//!             ],
//!         ),
//!         NodeDef(name: "work", state: StateDef(kind: "instant"), mode: RestartGraph),
//!         NodeDef(name: "flee", state: StateDef(kind: "wait", params: {"ticks": 5})),
//!     ],
//! )
//! ```

use std::collections::BTreeMap;

use behavior_graph::{Combine, Outcome, RepeatMode};
use serde::{Deserialize, Serialize};

use crate::LoadResult;

/// A complete graph definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
    pub name: String,
    /// Name of the entry node.
    pub entry: String,
    /// Name of the node whose connections apply from every state.
    #[serde(default)]
    pub any: Option<String>,
    pub nodes: Vec<NodeDef>,
}

/// One node: its state, repeat policy and outgoing connections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    pub state: StateDef,
    #[serde(default)]
    pub mode: RepeatMode,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
}

/// A state kind plus its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateDef {
    pub kind: String,
    #[serde(default)]
    pub params: Params,
}

impl StateDef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Params::default(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// A connection to the node named `target`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDef {
    pub target: String,
    #[serde(default)]
    pub combine: Combine,
    #[serde(default)]
    pub conditions: Vec<ConditionDef>,
}

/// A condition, either built in or resolved through the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConditionDef {
    Random { min: f32, max: f32 },
    SuccessCheck { value: f32 },
    Constant(f32),
    Custom {
        kind: String,
        #[serde(default)]
        params: Params,
    },
}

/// A single parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Param::Bool(value)
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Number(value)
    }
}

impl From<u32> for Param {
    fn from(value: u32) -> Self {
        Param::Number(value.into())
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_owned())
    }
}

/// Named parameters for a state or custom condition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, Param>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter (builder pattern).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Param>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Param> {
        self.0.get(key)
    }

    pub fn number(&self, key: &str) -> LoadResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Param::Number(n)) => Ok(Some(*n)),
            Some(other) => anyhow::bail!("parameter '{}' must be a number, got {:?}", key, other),
        }
    }

    pub fn require_number(&self, key: &str) -> LoadResult<f64> {
        self.number(key)?
            .ok_or_else(|| anyhow::anyhow!("missing parameter '{}'", key))
    }

    /// A non-negative whole number that fits in `u32`.
    pub fn count(&self, key: &str) -> LoadResult<Option<u32>> {
        let Some(n) = self.number(key)? else {
            return Ok(None);
        };
        if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
            anyhow::bail!("parameter '{}' must be a whole number >= 0, got {}", key, n);
        }
        Ok(Some(n as u32))
    }

    pub fn flag(&self, key: &str) -> LoadResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Param::Bool(b)) => Ok(Some(*b)),
            Some(other) => anyhow::bail!("parameter '{}' must be a bool, got {:?}", key, other),
        }
    }

    pub fn text(&self, key: &str) -> LoadResult<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Param::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => anyhow::bail!("parameter '{}' must be a string, got {:?}", key, other),
        }
    }

    /// Parses `"succeeded"` / `"failed"` (case-insensitive), or a bool where
    /// `true` means success.
    pub fn outcome(&self, key: &str) -> LoadResult<Option<Outcome>> {
        let text = match self.get(key) {
            None => return Ok(None),
            Some(Param::Bool(success)) => return Ok(Some(Outcome::from(*success))),
            Some(Param::Text(text)) => text,
            Some(other) => {
                anyhow::bail!("parameter '{}' must be an outcome, got {:?}", key, other)
            }
        };
        match text.to_ascii_lowercase().as_str() {
            "succeeded" | "success" => Ok(Some(Outcome::Succeeded)),
            "failed" | "failure" => Ok(Some(Outcome::Failed)),
            _ => anyhow::bail!("parameter '{}' is not an outcome: {}", key, text),
        }
    }
}
