//! Graph nodes (behaviour states).

use std::fmt;

use crate::{Connection, Evaluation, Graph, GraphId, State};

/// Stable handle to a node inside a specific graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    graph: GraphId,
    index: u32,
}

impl NodeId {
    pub(crate) fn new(graph: GraphId, index: u32) -> Self {
        Self { graph, index }
    }

    /// The graph this node was created in.
    pub fn graph(self) -> GraphId {
        self.graph
    }

    /// Creation index inside the graph. Never reused after removal.
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:n{}", self.graph, self.index)
    }
}

/// What a node does when it has ended and no outgoing transition wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepeatMode {
    /// Stay in the node and wait for a transition to become viable.
    #[default]
    RunOnce,
    /// Re-enter the node, running `on_begin` again.
    Loop,
    /// Return to the graph's entry node.
    RestartGraph,
}

/// One behaviour state and its outgoing connections.
pub struct Node<C> {
    id: NodeId,
    name: String,
    mode: RepeatMode,
    state: Box<dyn State<C>>,
    connections: Vec<Connection<C>>,
}

impl<C> Node<C> {
    pub(crate) fn new(
        id: NodeId,
        name: String,
        state: Box<dyn State<C>>,
        mode: RepeatMode,
    ) -> Self {
        Self {
            id,
            name,
            mode,
            state,
            connections: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RepeatMode) {
        self.mode = mode;
    }

    pub fn state(&self) -> &dyn State<C> {
        self.state.as_ref()
    }

    /// Outgoing connections in declaration order.
    pub fn connections(&self) -> &[Connection<C>] {
        &self.connections
    }

    /// The connection leading to `target`, if any.
    pub fn connection(&self, target: NodeId) -> Option<&Connection<C>> {
        self.connections.iter().find(|c| c.target() == target)
    }

    /// Mutable access to the connection leading to `target`, for editing its
    /// condition list or combine mode.
    pub fn connection_mut(&mut self, target: NodeId) -> Option<&mut Connection<C>> {
        self.connections.iter_mut().find(|c| c.target() == target)
    }

    pub fn has_connection(&self, target: NodeId) -> bool {
        self.connection(target).is_some()
    }

    pub(crate) fn push_connection(&mut self, connection: Connection<C>) {
        self.connections.push(connection);
    }

    /// Removes every connection to `target`, returning how many were removed.
    pub(crate) fn remove_connections_to(&mut self, target: NodeId) -> usize {
        let before = self.connections.len();
        self.connections.retain(|c| c.target() != target);
        before - self.connections.len()
    }

    /// Picks the best-scoring connection out of this node.
    ///
    /// The graph's any node is considered first (unless this node is the any
    /// node), then this node's own connections in declaration order. A
    /// connection must score strictly above 0, and strictly above every
    /// earlier candidate, to win; ties keep the first one seen.
    pub fn next_connection<'g>(
        &'g self,
        graph: &'g Graph<C>,
        eval: &mut Evaluation<'_, C>,
    ) -> Option<&'g Connection<C>> {
        let global = graph
            .any()
            .filter(|&any| any != self.id)
            .and_then(|any| graph.node(any))
            .map(|any| any.connections.as_slice())
            .unwrap_or_default();

        let mut best = None;
        let mut best_score = 0.0_f32;
        for connection in global.iter().chain(&self.connections) {
            let score = connection.evaluate(eval);
            tracing::trace!(
                "node {} -> {}: score={}",
                self.name,
                connection.target(),
                score
            );
            if score > best_score {
                best_score = score;
                best = Some(connection);
            }
        }
        best
    }

    /// Target of [`next_connection`](Self::next_connection).
    pub fn next_state(&self, graph: &Graph<C>, eval: &mut Evaluation<'_, C>) -> Option<NodeId> {
        self.next_connection(graph, eval).map(Connection::target)
    }
}

impl<C> fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("connections", &self.connections)
            .finish()
    }
}
