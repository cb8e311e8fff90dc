//! FlowGraph: the aggregate holding every node and edge of one graph.
//!
//! [`FlowGraph`] is the sole unit of validation and persistence. Its maps
//! are private: structural state changes only through the Mutation API
//! (see [`crate::mutation`]) or by admitting a whole snapshot with
//! [`FlowGraph::from_snapshot`]. Read-only accessors are provided for
//! traversals and rendering.
//!
//! Nodes and edges keep insertion order so snapshots serialize
//! deterministically.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::id::{EdgeId, NodeId};
use crate::node::Node;
use crate::snapshot::GraphSnapshot;

/// The emission flow graph aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "GraphSnapshot", try_from = "GraphSnapshot")]
pub struct FlowGraph {
    id: Option<String>,
    name: String,
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
}

impl FlowGraph {
    /// Creates an empty graph with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        FlowGraph {
            id: None,
            name: name.into(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
        }
    }

    /// Assembles a graph from already-checked parts.
    ///
    /// Used by snapshot admission after the structural checks passed.
    pub(crate) fn from_parts(
        id: Option<String>,
        name: String,
        nodes: IndexMap<NodeId, Node>,
        edges: IndexMap<EdgeId, Edge>,
    ) -> Self {
        FlowGraph {
            id,
            name,
            nodes,
            edges,
        }
    }

    // -----------------------------------------------------------------------
    // Graph-level metadata
    // -----------------------------------------------------------------------

    /// Storage id, if the graph has been persisted.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the graph. Presentation-only, no checks.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Edges whose source is `node`.
    pub fn outgoing<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| &e.source == node)
    }

    /// Edges whose target is `node`.
    pub fn incoming<'a>(&'a self, node: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.values().filter(move |e| &e.target == node)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -----------------------------------------------------------------------
    // Crate-internal raw edits (callers uphold the invariants)
    // -----------------------------------------------------------------------

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.edges.insert(edge.id.clone(), edge);
    }

    pub(crate) fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.shift_remove(id)
    }

    pub(crate) fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        self.edges.shift_remove(id)
    }
}
