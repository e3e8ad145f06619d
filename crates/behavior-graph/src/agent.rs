//! The agent: one running walk over a shared graph.
//!
//! An [`Agent`] holds the current node and its run flags, and advances at
//! most one transition per call to [`Agent::tick`]. The graph is shared
//! (`Arc`) and never mutated by the agent; everything per-walk lives here.
//!
//! # Tick algorithm
//!
//! 1. No graph: nothing happens.
//! 2. No current node: enter the graph's entry node (runs `on_begin`).
//! 3. Still no current node, or paused: nothing more happens.
//! 4. Current state not ended: run its `on_tick` hook and stop.
//! 5. Current state ended: follow the best connection, or apply the node's
//!    [`RepeatMode`] when none scores above 0.
//!
//! Step 2 runs even while paused, so a stopped agent that keeps being ticked
//! primes its entry node but never advances past it until resumed.

use std::fmt;
use std::sync::Arc;

use crate::{
    AgentConfig, Evaluation, Graph, Node, NodeId, Outcome, Pcg32, RandomSource, RepeatMode,
    State, StateContext,
};

/// Coarse lifecycle phase of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentPhase {
    /// No graph assigned.
    NoGraph,
    /// Has a graph, will enter its entry node on the next tick.
    NotStarted,
    /// Walking the graph.
    Running,
    /// Sitting in an ended run-once node with no viable transition.
    Waiting,
    /// Paused inside a node.
    Paused,
    /// Paused with no current node (after [`Agent::stop`]).
    Stopped,
}

/// Persistable view of an agent's progress.
///
/// Nodes are recorded by name because [`NodeId`]s are only unique within one
/// process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub graph: Option<String>,
    pub current: Option<String>,
    pub paused: bool,
    pub ended: bool,
    pub waiting: bool,
    pub outcome: Outcome,
    pub ticks_in_state: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Begin,
    End,
    Pause,
    Resume,
    Tick,
}

impl Hook {
    fn invoke<C>(self, state: &dyn State<C>, ctx: &mut StateContext<'_, C>) {
        match self {
            Hook::Begin => state.on_begin(ctx),
            Hook::End => state.on_end(ctx),
            Hook::Pause => state.on_pause(ctx),
            Hook::Resume => state.on_resume(ctx),
            Hook::Tick => state.on_tick(ctx),
        }
    }
}

/// Drives one walk over a behaviour graph.
pub struct Agent<C> {
    graph: Option<Arc<Graph<C>>>,
    current: Option<NodeId>,
    paused: bool,
    ended: bool,
    waiting: bool,
    outcome: Outcome,
    ticks_in_state: u32,
    rng: Box<dyn RandomSource>,
}

impl<C> Agent<C> {
    /// Creates an agent with no graph.
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            graph: None,
            current: None,
            paused: false,
            ended: false,
            waiting: false,
            outcome: Outcome::default(),
            ticks_in_state: 0,
            rng: Box::new(Pcg32::new(config.seed)),
        }
    }

    /// Creates an agent that will enter `graph`'s entry node on its first tick.
    pub fn with_graph(graph: Arc<Graph<C>>) -> Self {
        let mut agent = Self::new(&AgentConfig::default());
        agent.graph = Some(graph);
        agent
    }

    /// Replaces the random source used by random conditions.
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn graph(&self) -> Option<&Arc<Graph<C>>> {
        self.graph.as_ref()
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn current_node(&self) -> Option<&Node<C>> {
        self.graph.as_deref()?.node(self.current?)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the current state has been marked as ended.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Whether the agent is idling in an ended run-once node.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Outcome of the most recently ended state.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Running ticks spent in the current node since it was entered.
    pub fn ticks_in_state(&self) -> u32 {
        self.ticks_in_state
    }

    pub fn phase(&self) -> AgentPhase {
        match (&self.graph, self.current, self.paused) {
            (None, _, _) => AgentPhase::NoGraph,
            (Some(_), None, true) => AgentPhase::Stopped,
            (Some(_), None, false) => AgentPhase::NotStarted,
            (Some(_), Some(_), true) => AgentPhase::Paused,
            (Some(_), Some(_), false) if self.waiting => AgentPhase::Waiting,
            (Some(_), Some(_), false) => AgentPhase::Running,
        }
    }

    /// Stops the current run and switches to `graph`.
    ///
    /// The agent stays stopped; call [`restart`](Self::restart) to run it.
    pub fn set_behaviour(&mut self, graph: Option<Arc<Graph<C>>>, host: &mut C) {
        self.stop(host);
        self.graph = graph;
    }

    pub fn pause(&mut self, host: &mut C) {
        if self.paused {
            return;
        }
        self.paused = true;
        if let Some(id) = self.current {
            self.run_hook(id, Hook::Pause, host);
        }
    }

    pub fn resume(&mut self, host: &mut C) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if let Some(id) = self.current {
            self.run_hook(id, Hook::Resume, host);
        }
    }

    /// Pauses and forgets the current node. The graph stays assigned.
    pub fn stop(&mut self, host: &mut C) {
        self.pause(host);
        self.current = None;
        self.ended = false;
        self.waiting = false;
        self.ticks_in_state = 0;
    }

    /// Stops, then unpauses so the next tick enters the entry node afresh.
    pub fn restart(&mut self, host: &mut C) {
        self.stop(host);
        self.paused = false;
    }

    /// Marks the current state as ended with `outcome`.
    ///
    /// With `Some(node)`, the call only applies while `node` is current;
    /// completion signals from states the agent has already left are dropped.
    pub fn end(&mut self, node: Option<NodeId>, outcome: Outcome, host: &mut C) {
        let Some(current) = self.current else {
            tracing::debug!("end({:?}) ignored: no current node", outcome);
            return;
        };
        if let Some(node) = node
            && node != current
        {
            tracing::debug!("end({:?}) from stale node {} ignored", outcome, node);
            return;
        }
        self.finish(current, outcome, host);
    }

    pub fn end_current(&mut self, outcome: Outcome, host: &mut C) {
        self.end(None, outcome, host);
    }

    /// Advances the agent by one step.
    pub fn tick(&mut self, host: &mut C) {
        let Some(graph) = self.graph.clone() else {
            return;
        };

        if self.current.is_none() {
            self.ended = false;
            match graph.entry() {
                Some(entry) if graph.contains(entry) => self.enter(entry, host),
                Some(entry) => {
                    tracing::warn!("graph {}: entry node {} is missing", graph.name(), entry);
                }
                None => {}
            }
        }

        let Some(current) = self.current else {
            return;
        };
        if self.paused {
            return;
        }

        if !self.ended {
            self.ticks_in_state = self.ticks_in_state.saturating_add(1);
            self.run_hook(current, Hook::Tick, host);
            return;
        }

        let Some(node) = graph.node(current) else {
            tracing::warn!("graph {}: current node {} is missing", graph.name(), current);
            self.current = None;
            return;
        };

        let next = {
            let mut eval = Evaluation::new(
                &*host,
                Some(current),
                self.outcome,
                self.ticks_in_state,
                self.rng.as_mut(),
            );
            node.next_state(&graph, &mut eval)
        }
        .filter(|&next| graph.contains(next));

        if let Some(next) = next {
            tracing::debug!(
                "graph {}: {} -> {}",
                graph.name(),
                node.name(),
                graph.node(next).map_or("?", Node::name)
            );
            self.enter(next, host);
            return;
        }

        match node.mode() {
            RepeatMode::RunOnce => {
                if !self.waiting {
                    tracing::debug!("graph {}: waiting in {}", graph.name(), node.name());
                }
                self.waiting = true;
            }
            RepeatMode::Loop => {
                tracing::debug!("graph {}: looping {}", graph.name(), node.name());
                self.enter(current, host);
            }
            RepeatMode::RestartGraph => {
                tracing::debug!("graph {}: restarting from {}", graph.name(), node.name());
                self.ended = false;
                match graph.entry().filter(|&entry| graph.contains(entry)) {
                    Some(entry) => self.enter(entry, host),
                    None => self.current = None,
                }
            }
        }
    }

    /// Captures the agent's progress for persistence.
    pub fn snapshot(&self) -> AgentSnapshot {
        let graph = self.graph.as_deref();
        AgentSnapshot {
            graph: graph.map(|g| g.name().to_owned()),
            current: self
                .current
                .and_then(|id| graph?.node(id))
                .map(|node| node.name().to_owned()),
            paused: self.paused,
            ended: self.ended,
            waiting: self.waiting,
            outcome: self.outcome,
            ticks_in_state: self.ticks_in_state,
        }
    }

    /// Restores progress captured by [`snapshot`](Self::snapshot) onto `graph`.
    ///
    /// No hooks run. Nodes are matched by name, so `graph` may be a rebuilt
    /// or renamed copy; a differing graph name is only logged. If the recorded
    /// node no longer exists the agent restarts from the entry node on its
    /// next tick.
    pub fn restore(&mut self, snapshot: &AgentSnapshot, graph: Arc<Graph<C>>) {
        if let Some(name) = &snapshot.graph
            && name != graph.name()
        {
            tracing::warn!(
                "snapshot taken on graph {} restored onto graph {}",
                name,
                graph.name()
            );
        }
        let current = snapshot.current.as_deref().and_then(|name| graph.find(name));
        if let Some(name) = &snapshot.current
            && current.is_none()
        {
            tracing::warn!(
                "graph {}: snapshot node {} not found, restarting",
                graph.name(),
                name
            );
        }

        self.graph = Some(graph);
        self.current = current;
        self.paused = snapshot.paused;
        self.outcome = snapshot.outcome;
        if current.is_some() {
            self.ended = snapshot.ended;
            self.waiting = snapshot.waiting;
            self.ticks_in_state = snapshot.ticks_in_state;
        } else {
            self.ended = false;
            self.waiting = false;
            self.ticks_in_state = 0;
        }
    }

    fn enter(&mut self, id: NodeId, host: &mut C) {
        self.current = Some(id);
        self.ended = false;
        self.waiting = false;
        self.ticks_in_state = 0;
        self.run_hook(id, Hook::Begin, host);
    }

    fn finish(&mut self, id: NodeId, outcome: Outcome, host: &mut C) {
        self.outcome = outcome;
        self.ended = true;
        // An end requested from inside on_end has nothing left to end.
        let _ = self.dispatch(id, Hook::End, host);
    }

    fn run_hook(&mut self, id: NodeId, hook: Hook, host: &mut C) {
        if let Some(outcome) = self.dispatch(id, hook, host)
            && self.current == Some(id)
        {
            self.finish(id, outcome, host);
        }
    }

    /// Runs one hook and returns the end it requested, if any.
    fn dispatch(&mut self, id: NodeId, hook: Hook, host: &mut C) -> Option<Outcome> {
        let graph = self.graph.clone()?;
        let node = graph.node(id)?;
        tracing::trace!("graph {}: {:?} {}", graph.name(), hook, node.name());

        let mut ctx = StateContext::new(host, id, self.outcome, self.ticks_in_state);
        hook.invoke(node.state(), &mut ctx);
        ctx.take_end()
    }
}

impl<C> Default for Agent<C> {
    fn default() -> Self {
        Self::new(&AgentConfig::default())
    }
}

impl<C> fmt::Debug for Agent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("graph", &self.graph.as_ref().map(|g| g.name()))
            .field("current", &self.current)
            .field("paused", &self.paused)
            .field("ended", &self.ended)
            .field("waiting", &self.waiting)
            .field("outcome", &self.outcome)
            .field("ticks_in_state", &self.ticks_in_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Combine, states::Idle, states::Instant};

    fn pair() -> (Arc<Graph<()>>, NodeId, NodeId) {
        let mut graph = Graph::new("pair");
        let a = graph.add_node("a", Idle, RepeatMode::RunOnce);
        let b = graph.add_node("b", Idle, RepeatMode::RunOnce);
        graph.set_entry(Some(a)).unwrap();
        graph.connect(a, b, Combine::Sum, Vec::new()).unwrap();
        (Arc::new(graph), a, b)
    }

    #[test]
    fn no_graph_is_a_no_op() {
        let mut agent = Agent::<()>::default();
        agent.tick(&mut ());
        assert_eq!(agent.phase(), AgentPhase::NoGraph);
        assert_eq!(agent.current(), None);
    }

    #[test]
    fn first_tick_enters_entry() {
        let (graph, a, _) = pair();
        let mut agent = Agent::with_graph(graph);
        assert_eq!(agent.phase(), AgentPhase::NotStarted);
        agent.tick(&mut ());
        assert_eq!(agent.current(), Some(a));
        assert_eq!(agent.phase(), AgentPhase::Running);
        assert_eq!(agent.current_node().map(Node::name), Some("a"));
    }

    #[test]
    fn end_then_tick_transitions() {
        let (graph, a, b) = pair();
        let mut agent = Agent::with_graph(graph);
        agent.tick(&mut ());
        agent.end(Some(a), Outcome::Succeeded, &mut ());
        assert!(agent.is_ended());
        agent.tick(&mut ());
        assert_eq!(agent.current(), Some(b));
        assert!(!agent.is_ended());
    }

    #[test]
    fn end_without_current_is_ignored() {
        let (graph, _, _) = pair();
        let mut agent = Agent::with_graph(graph);
        agent.end_current(Outcome::Failed, &mut ());
        assert!(!agent.is_ended());
        assert_eq!(agent.outcome(), Outcome::Succeeded);
    }

    #[test]
    fn set_behaviour_stops_until_restart() {
        let (first, _, _) = pair();
        let (second, c, _) = pair();
        let mut agent = Agent::with_graph(first);
        agent.tick(&mut ());

        agent.set_behaviour(Some(second), &mut ());
        assert_eq!(agent.phase(), AgentPhase::Stopped);
        assert_eq!(agent.current(), None);

        agent.restart(&mut ());
        agent.tick(&mut ());
        assert_eq!(agent.current(), Some(c));
        assert_eq!(agent.phase(), AgentPhase::Running);
    }

    #[test]
    fn restart_graph_without_entry_clears_current() {
        let mut graph = Graph::<()>::new("orphan");
        let a = graph.add_node("a", Instant(Outcome::Succeeded), RepeatMode::RestartGraph);
        graph.set_entry(Some(a)).unwrap();
        let graph = Arc::new(graph);

        let mut agent = Agent::with_graph(graph.clone());
        agent.tick(&mut ());
        assert_eq!(agent.current(), Some(a));

        // Restore the same progress onto a graph with no entry.
        let snapshot = agent.snapshot();
        let mut bare = Graph::<()>::new("bare");
        bare.add_node("a", Instant(Outcome::Succeeded), RepeatMode::RestartGraph);
        agent.restore(&snapshot, Arc::new(bare));
        assert!(agent.is_ended());
        agent.tick(&mut ());
        assert_eq!(agent.current(), None);
        agent.tick(&mut ());
        assert_eq!(agent.current(), None);
    }

    #[test]
    fn snapshot_round_trips_progress() {
        let (graph, _, b) = pair();
        let mut agent = Agent::with_graph(graph.clone());
        agent.tick(&mut ());
        agent.end_current(Outcome::Failed, &mut ());
        agent.tick(&mut ());
        agent.tick(&mut ());

        let snapshot = agent.snapshot();
        assert_eq!(snapshot.graph.as_deref(), Some("pair"));
        assert_eq!(snapshot.current.as_deref(), Some("b"));
        assert_eq!(snapshot.outcome, Outcome::Failed);
        assert_eq!(snapshot.ticks_in_state, 1);

        let mut restored = Agent::<()>::default();
        restored.restore(&snapshot, graph);
        assert_eq!(restored.current(), Some(b));
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn restore_onto_renamed_graph_maps_by_node_name() {
        let (graph, _, _) = pair();
        let mut agent = Agent::with_graph(graph);
        agent.tick(&mut ());
        agent.end_current(Outcome::Succeeded, &mut ());
        agent.tick(&mut ());
        let snapshot = agent.snapshot();
        assert_eq!(snapshot.current.as_deref(), Some("b"));

        let mut renamed = Graph::new("pair-v2");
        let a = renamed.add_node("a", Idle, RepeatMode::RunOnce);
        let b = renamed.add_node("b", Idle, RepeatMode::RunOnce);
        renamed.set_entry(Some(a)).unwrap();
        renamed.connect(a, b, Combine::Sum, Vec::new()).unwrap();

        let mut restored = Agent::<()>::default();
        restored.restore(&snapshot, Arc::new(renamed));
        assert_eq!(restored.current(), Some(b));
        assert_eq!(restored.snapshot().graph.as_deref(), Some("pair-v2"));
    }

    #[test]
    fn restore_with_unknown_node_restarts() {
        let (graph, a, _) = pair();
        let snapshot = AgentSnapshot {
            graph: Some("pair".into()),
            current: Some("gone".into()),
            ended: true,
            ..AgentSnapshot::default()
        };
        let mut agent = Agent::<()>::default();
        agent.restore(&snapshot, graph);
        assert_eq!(agent.current(), None);
        assert!(!agent.is_ended());
        agent.tick(&mut ());
        assert_eq!(agent.current(), Some(a));
    }
}
