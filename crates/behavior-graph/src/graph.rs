//! The behaviour graph: an ordered set of nodes with an entry node and an
//! optional "any" node whose connections apply from every state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Combine, Condition, Connection, Node, NodeId, RepeatMode, State};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a graph, embedded in every [`NodeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Errors raised while authoring a graph.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node {node} does not belong to graph {graph}")]
    ForeignNode { node: NodeId, graph: GraphId },

    #[error("node {0} is not in the graph")]
    NodeNotFound(NodeId),

    #[error("node {0} is the entry node and cannot be a connection target")]
    TargetIsEntry(NodeId),

    #[error("node {0} is the any node and cannot be a connection target")]
    TargetIsAny(NodeId),

    #[error("node {from} already connects to {to}")]
    DuplicateConnection { from: NodeId, to: NodeId },

    #[error("node {0} is already a connection target")]
    AlreadyTargeted(NodeId),
}

/// Exclusive owner of a set of nodes and their connections.
///
/// Author a graph while it is owned, then share it between agents with
/// `Arc<Graph<C>>`.
pub struct Graph<C> {
    id: GraphId,
    name: String,
    nodes: Vec<Node<C>>,
    next_index: u32,
    entry: Option<NodeId>,
    any: Option<NodeId>,
}

impl<C> Graph<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GraphId::next(),
            name: name.into(),
            nodes: Vec::new(),
            next_index: 0,
            entry: None,
            any: None,
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn entry(&self) -> Option<NodeId> {
        self.entry
    }

    pub fn any(&self) -> Option<NodeId> {
        self.any
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node<C>> {
        self.nodes.iter()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<C>> {
        self.position(id).map(|i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<C>> {
        self.position(id).map(|i| &mut self.nodes[i])
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name() == name).map(Node::id)
    }

    /// Appends a node and returns its handle.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        state: impl State<C> + 'static,
        mode: RepeatMode,
    ) -> NodeId {
        self.add_boxed_node(name, Box::new(state), mode)
    }

    /// Appends a node whose state is already boxed.
    pub fn add_boxed_node(
        &mut self,
        name: impl Into<String>,
        state: Box<dyn State<C>>,
        mode: RepeatMode,
    ) -> NodeId {
        let id = NodeId::new(self.id, self.next_index);
        self.next_index += 1;
        self.nodes.push(Node::new(id, name.into(), state, mode));
        id
    }

    /// Removes a node, clearing entry/any if they pointed at it and pruning
    /// every connection that targeted it.
    ///
    /// Returns `false` if the node was not in the graph.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        self.nodes.remove(position);

        if self.entry == Some(id) {
            self.entry = None;
        }
        if self.any == Some(id) {
            self.any = None;
        }
        for node in &mut self.nodes {
            node.remove_connections_to(id);
        }
        tracing::debug!("graph {}: removed node {}", self.name, id);
        true
    }

    /// Designates the entry node. `None` unsets it.
    pub fn set_entry(&mut self, entry: Option<NodeId>) -> Result<(), GraphError> {
        if let Some(id) = entry {
            self.check_reservable(id)?;
        }
        self.entry = entry;
        Ok(())
    }

    /// Designates the any node. `None` unsets it.
    pub fn set_any(&mut self, any: Option<NodeId>) -> Result<(), GraphError> {
        if let Some(id) = any {
            self.check_reservable(id)?;
        }
        self.any = any;
        Ok(())
    }

    /// Adds a connection from `source` to `target`.
    ///
    /// Fails if either node is missing or foreign, if the target is the entry
    /// or any node, or if `source` already connects to `target`.
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        combine: Combine,
        conditions: Vec<Box<dyn Condition<C>>>,
    ) -> Result<(), GraphError> {
        self.check_member(target)?;
        if self.entry == Some(target) {
            return Err(GraphError::TargetIsEntry(target));
        }
        if self.any == Some(target) {
            return Err(GraphError::TargetIsAny(target));
        }
        self.check_member(source)?;

        let node = self
            .node_mut(source)
            .ok_or(GraphError::NodeNotFound(source))?;
        if node.has_connection(target) {
            return Err(GraphError::DuplicateConnection {
                from: source,
                to: target,
            });
        }
        node.push_connection(Connection::with_conditions(target, combine, conditions));
        Ok(())
    }

    /// Removes every connection from `source` to `target`.
    ///
    /// Returns `true` if anything was removed.
    pub fn disconnect(&mut self, source: NodeId, target: NodeId) -> bool {
        self.node_mut(source)
            .is_some_and(|node| node.remove_connections_to(target) > 0)
    }

    pub fn has_connection(&self, source: NodeId, target: NodeId) -> bool {
        self.node(source)
            .is_some_and(|node| node.has_connection(target))
    }

    /// Drops every node and resets entry/any.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entry = None;
        self.any = None;
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        if id.graph() != self.id {
            return None;
        }
        // Indices only grow, so nodes stay sorted by index.
        self.nodes
            .binary_search_by_key(&id.index(), |n| n.id().index())
            .ok()
    }

    fn check_member(&self, id: NodeId) -> Result<(), GraphError> {
        if id.graph() != self.id {
            return Err(GraphError::ForeignNode {
                node: id,
                graph: self.id,
            });
        }
        if !self.contains(id) {
            return Err(GraphError::NodeNotFound(id));
        }
        Ok(())
    }

    fn check_reservable(&self, id: NodeId) -> Result<(), GraphError> {
        self.check_member(id)?;
        if self.nodes.iter().any(|n| n.has_connection(id)) {
            return Err(GraphError::AlreadyTargeted(id));
        }
        Ok(())
    }
}

impl<'g, C> IntoIterator for &'g Graph<C> {
    type Item = &'g Node<C>;
    type IntoIter = std::slice::Iter<'g, Node<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<C> fmt::Debug for Graph<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("entry", &self.entry)
            .field("any", &self.any)
            .field("nodes", &self.nodes)
            .finish()
    }
}
