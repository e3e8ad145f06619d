//! Kind registry: resolves string discriminators into states and conditions.

use std::collections::HashMap;

use anyhow::Context;
use behavior_graph::{
    Condition, Constant, Graph, Idle, Instant, NodeId, RandomRange, State, SuccessCheck, Wait,
};

use crate::{ConditionDef, GraphDef, LoadResult, Params, StateDef};

type StateFactory<C> = Box<dyn Fn(&Params) -> LoadResult<Box<dyn State<C>>> + Send + Sync>;
type ConditionFactory<C> =
    Box<dyn Fn(&Params) -> LoadResult<Box<dyn Condition<C>>> + Send + Sync>;

/// Maps state and condition kinds to factories.
///
/// Built-in state kinds (registered by [`Registry::with_builtins`]):
///
/// | kind | params |
/// |---|---|
/// | `idle` | none |
/// | `instant` | `outcome`: `"succeeded"` (default) or `"failed"` |
/// | `wait` | `ticks` (required), `outcome` |
pub struct Registry<C> {
    states: HashMap<String, StateFactory<C>>,
    conditions: HashMap<String, ConditionFactory<C>>,
}

impl<C: 'static> Registry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            conditions: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in state kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_state("idle", |_| Ok(Box::new(Idle)))
            .register_state("instant", |params| {
                let outcome = params.outcome("outcome")?.unwrap_or_default();
                Ok(Box::new(Instant(outcome)))
            })
            .register_state("wait", |params| {
                let ticks = params
                    .count("ticks")?
                    .ok_or_else(|| anyhow::anyhow!("wait requires 'ticks'"))?;
                let outcome = params.outcome("outcome")?.unwrap_or_default();
                Ok(Box::new(Wait::new(ticks).with_outcome(outcome)))
            });
        registry
    }

    /// Registers (or replaces) a state kind.
    pub fn register_state<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Params) -> LoadResult<Box<dyn State<C>>> + Send + Sync + 'static,
    {
        self.states.insert(kind.into(), Box::new(factory));
        self
    }

    /// Registers (or replaces) a custom condition kind.
    pub fn register_condition<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&Params) -> LoadResult<Box<dyn Condition<C>>> + Send + Sync + 'static,
    {
        self.conditions.insert(kind.into(), Box::new(factory));
        self
    }

    pub fn has_state(&self, kind: &str) -> bool {
        self.states.contains_key(kind)
    }

    pub fn has_condition(&self, kind: &str) -> bool {
        self.conditions.contains_key(kind)
    }

    pub fn build_state(&self, def: &StateDef) -> LoadResult<Box<dyn State<C>>> {
        let factory = self
            .states
            .get(&def.kind)
            .ok_or_else(|| anyhow::anyhow!("unknown state kind '{}'", def.kind))?;
        factory(&def.params).with_context(|| format!("invalid '{}' state", def.kind))
    }

    pub fn build_condition(&self, def: &ConditionDef) -> LoadResult<Box<dyn Condition<C>>> {
        Ok(match def {
            ConditionDef::Random { min, max } => Box::new(RandomRange::new(*min, *max)),
            ConditionDef::SuccessCheck { value } => Box::new(SuccessCheck::new(*value)),
            ConditionDef::Constant(value) => Box::new(Constant(*value)),
            ConditionDef::Custom { kind, params } => {
                let factory = self
                    .conditions
                    .get(kind)
                    .ok_or_else(|| anyhow::anyhow!("unknown condition kind '{}'", kind))?;
                factory(params).with_context(|| format!("invalid '{}' condition", kind))?
            }
        })
    }

    /// Builds a graph from its definition.
    ///
    /// Fails on unknown kinds, duplicate or unknown node names, and on any
    /// connection the graph itself rejects.
    pub fn build_graph(&self, def: &GraphDef) -> LoadResult<Graph<C>> {
        let mut graph = Graph::new(def.name.clone());
        let mut ids: HashMap<&str, NodeId> = HashMap::new();

        for node in &def.nodes {
            let state = self
                .build_state(&node.state)
                .with_context(|| format!("graph '{}', node '{}'", def.name, node.name))?;
            let id = graph.add_boxed_node(node.name.clone(), state, node.mode);
            if ids.insert(node.name.as_str(), id).is_some() {
                anyhow::bail!("graph '{}': duplicate node name '{}'", def.name, node.name);
            }
        }

        let lookup = |name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| anyhow::anyhow!("graph '{}': unknown node '{}'", def.name, name))
        };

        graph.set_entry(Some(lookup(&def.entry)?))?;
        if let Some(any) = &def.any {
            graph.set_any(Some(lookup(any)?))?;
        }

        for node in &def.nodes {
            let source = lookup(&node.name)?;
            for connection in &node.connections {
                let target = lookup(&connection.target)?;
                let conditions = connection
                    .conditions
                    .iter()
                    .map(|c| self.build_condition(c))
                    .collect::<LoadResult<Vec<_>>>()
                    .with_context(|| {
                        format!(
                            "graph '{}': {} -> {}",
                            def.name, node.name, connection.target
                        )
                    })?;
                graph
                    .connect(source, target, connection.combine, conditions)
                    .with_context(|| {
                        format!(
                            "graph '{}': {} -> {}",
                            def.name, node.name, connection.target
                        )
                    })?;
            }
        }

        tracing::debug!(
            "built graph '{}' with {} nodes",
            graph.name(),
            graph.len()
        );
        Ok(graph)
    }
}

impl<C: 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::with_builtins()
    }
}
