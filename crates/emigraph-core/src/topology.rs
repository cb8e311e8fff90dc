//! Topology Checker: cycle detection and traversal order over edge sets.
//!
//! [`FlowIndex`] is a throwaway petgraph adjacency built over borrowed
//! edges for the duration of one check. It is the only place in the
//! workspace that knows what a cycle is:
//! - [`would_create_cycle`] answers the per-edit question (eager checking
//!   in the Mutation API).
//! - [`find_cycles`] scans a whole edge set and reports every cycle (used
//!   by the standalone validator).
//!
//! Both are pure: they read edges and never modify the graph.

use std::collections::{HashMap, HashSet};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

use crate::edge::Edge;
use crate::graph::FlowGraph;
use crate::id::{EdgeId, NodeId};

/// Adjacency index over a borrowed set of edges.
///
/// Node weights are node ids, edge weights are the edges themselves, so
/// parallel edges between the same pair of nodes stay distinct. Edges may
/// reference node ids with no `Node` behind them (raw snapshots); such ids
/// simply become index vertices.
#[derive(Debug, Default)]
pub struct FlowIndex<'a> {
    graph: DiGraph<&'a NodeId, &'a Edge>,
    lookup: HashMap<&'a NodeId, NodeIndex>,
}

impl<'a> FlowIndex<'a> {
    /// Builds an index over `edges`.
    pub fn from_edges(edges: impl IntoIterator<Item = &'a Edge>) -> Self {
        let mut index = FlowIndex::default();
        for edge in edges {
            index.add_edge(edge);
        }
        index
    }

    /// Builds an index over every edge of `graph` except `excluding`.
    pub fn of_graph(graph: &'a FlowGraph, excluding: Option<&EdgeId>) -> Self {
        FlowIndex::from_edges(graph.edges().filter(|e| Some(&e.id) != excluding))
    }

    /// Registers a vertex for `id` (idempotent).
    pub fn add_node(&mut self, id: &'a NodeId) -> NodeIndex {
        if let Some(&ix) = self.lookup.get(id) {
            return ix;
        }
        let ix = self.graph.add_node(id);
        self.lookup.insert(id, ix);
        ix
    }

    pub fn add_edge(&mut self, edge: &'a Edge) {
        let from = self.add_node(&edge.source);
        let to = self.add_node(&edge.target);
        self.graph.add_edge(from, to, edge);
    }

    fn index_of(&self, id: &NodeId) -> Option<NodeIndex> {
        self.lookup.get(id).copied()
    }

    /// Edges leaving `node`.
    pub fn outgoing(&self, node: &NodeId) -> impl Iterator<Item = &'a Edge> + '_ {
        self.edges_directed(node, Direction::Outgoing)
    }

    /// Edges arriving at `node`.
    pub fn incoming(&self, node: &NodeId) -> impl Iterator<Item = &'a Edge> + '_ {
        self.edges_directed(node, Direction::Incoming)
    }

    fn edges_directed(
        &self,
        node: &NodeId,
        dir: Direction,
    ) -> impl Iterator<Item = &'a Edge> + '_ {
        self.index_of(node)
            .into_iter()
            .flat_map(move |ix| self.graph.edges_directed(ix, dir).map(|e| *e.weight()))
    }

    /// Returns whether `goal` is reachable from `start`.
    ///
    /// Depth-first search with a visited set (bounds work to O(V+E)) and a
    /// recursion stack. Meeting a vertex that is still on the stack means
    /// the indexed edges already contain a cycle downstream of `start`;
    /// that is reported as [`Reach::CycleAhead`] rather than ignored.
    pub fn reach(&self, start: &NodeId, goal: &NodeId) -> Reach {
        if start == goal {
            return Reach::Found;
        }
        let (Some(start), Some(goal)) = (self.index_of(start), self.index_of(goal)) else {
            return Reach::Unreachable;
        };

        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut stack = vec![(start, self.graph.neighbors_directed(start, Direction::Outgoing))];
        visited.insert(start);
        on_stack.insert(start);

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            match frame.1.next() {
                Some(next) if next == goal => return Reach::Found,
                Some(next) if on_stack.contains(&next) => return Reach::CycleAhead,
                Some(next) => {
                    if visited.insert(next) {
                        on_stack.insert(next);
                        stack.push((next, self.graph.neighbors_directed(next, Direction::Outgoing)));
                    }
                }
                None => {
                    on_stack.remove(&node);
                    stack.pop();
                }
            }
        }

        Reach::Unreachable
    }

    /// Every vertex reachable from any of `roots`, roots included.
    pub fn reachable_from<'r>(&self, roots: impl IntoIterator<Item = &'r NodeId>) -> HashSet<&'a NodeId> {
        let mut dfs = Dfs::empty(&self.graph);
        let mut seen = HashSet::new();
        for root in roots {
            let Some(ix) = self.index_of(root) else {
                continue;
            };
            dfs.move_to(ix);
            while let Some(n) = dfs.next(&self.graph) {
                seen.insert(self.graph[n]);
            }
        }
        seen
    }

    /// All indexed vertices in topological order, or `None` if the indexed
    /// edges contain a cycle.
    pub fn topological_order(&self) -> Option<Vec<&'a NodeId>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|ix| self.graph[ix]).collect())
    }

    /// Every cycle among the indexed edges, one entry per strongly
    /// connected component with more than one vertex or with a self-loop.
    pub fn cycles(&self) -> Vec<Vec<&'a NodeId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1 || self.graph.find_edge(component[0], component[0]).is_some()
            })
            .map(|component| {
                let mut ids: Vec<&NodeId> = component.into_iter().map(|ix| self.graph[ix]).collect();
                ids.sort();
                ids
            })
            .collect()
    }
}

/// Outcome of [`FlowIndex::reach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Found,
    /// The search ran into a cycle that already exists.
    CycleAhead,
    Unreachable,
}

/// Returns `true` iff adding `candidate` (source -> target) would create a
/// cycle, i.e. there already is a path from `candidate.target` back to
/// `candidate.source`.
///
/// `replacing` names an existing edge to leave out of the search; the
/// Mutation API passes the edge being updated so its current occurrence
/// does not count. A pre-existing cycle downstream of the target also
/// answers `true`: no edge may be wired into a region that is already
/// inconsistent.
pub fn would_create_cycle(candidate: &Edge, graph: &FlowGraph, replacing: Option<&EdgeId>) -> bool {
    let index = FlowIndex::of_graph(graph, replacing);
    index.reach(&candidate.target, &candidate.source) != Reach::Unreachable
}

/// Scans a whole edge set and returns every cycle as a sorted list of node
/// ids. An empty result means the edges form a DAG.
pub fn find_cycles<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> Vec<Vec<NodeId>> {
    FlowIndex::from_edges(edges)
        .cycles()
        .into_iter()
        .map(|ids| ids.into_iter().cloned().collect())
        .collect()
}
