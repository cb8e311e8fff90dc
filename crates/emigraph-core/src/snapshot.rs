//! Whole-graph snapshots exchanged with storage and transport layers.
//!
//! [`GraphSnapshot`] mirrors the wire shape exactly
//! (`{ id?, name, nodes: Node[], edges: Edge[] }`). Any snapshot can be
//! deserialized, including ones with duplicate ids or dangling edges; it
//! becomes a [`FlowGraph`] only after [`FlowGraph::from_snapshot`] accepts
//! its structure. Invariant checking (cycles, budgets, formula) is the job
//! of the standalone validator in `emigraph-check`.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::CoreError;
use crate::graph::FlowGraph;
use crate::node::Node;

/// Transport-agnostic snapshot of a whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Checks a node's numeric fields, describing every problem found.
pub(crate) fn node_field_issues(weight: f64, emissions: f64, label: &str) -> Vec<String> {
    let mut issues = Vec::new();
    if !weight.is_finite() || weight <= 0.0 {
        issues.push(format!("{label}: weight must be a positive number, got {weight}"));
    }
    if !emissions.is_finite() || emissions < 0.0 {
        issues.push(format!(
            "{label}: emissions must be a non-negative number, got {emissions}"
        ));
    }
    issues
}

/// Checks an edge's weight.
pub(crate) fn edge_weight_issue(weight: f64, label: &str) -> Option<String> {
    if !weight.is_finite() || weight <= 0.0 {
        Some(format!("{label}: weight must be a positive number, got {weight}"))
    } else {
        None
    }
}

impl GraphSnapshot {
    /// Lists every structural problem with this snapshot.
    ///
    /// Covers duplicate ids, non-positive or non-finite weights, negative or
    /// non-finite emissions, and edges referencing unknown nodes. An empty
    /// list means the snapshot can be turned into a [`FlowGraph`].
    pub fn schema_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut node_ids = HashSet::with_capacity(self.nodes.len());

        for node in &self.nodes {
            if !node_ids.insert(node.id.as_str()) {
                issues.push(format!("duplicate node id: {}", node.id));
            }
            issues.extend(node_field_issues(
                node.weight,
                node.emissions,
                &format!("node {}", node.id),
            ));
        }

        let mut edge_ids = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            let label = format!("edge {}", edge.id);
            if !edge_ids.insert(edge.id.as_str()) {
                issues.push(format!("duplicate edge id: {}", edge.id));
            }
            issues.extend(edge_weight_issue(edge.weight, &label));
            if !edge.emissions.is_finite() || edge.emissions < 0.0 {
                issues.push(format!(
                    "{label}: emissions must be a non-negative number, got {}",
                    edge.emissions
                ));
            }
            if !node_ids.contains(edge.source.as_str()) {
                issues.push(format!("{label}: unknown source node {}", edge.source));
            }
            if !node_ids.contains(edge.target.as_str()) {
                issues.push(format!("{label}: unknown target node {}", edge.target));
            }
        }

        issues
    }
}

impl FlowGraph {
    /// Accepts a snapshot whose structure is sound.
    ///
    /// Fails with [`CoreError::SchemaInvalid`] listing every structural issue.
    /// The graph invariants are NOT checked here; trust boundaries run the
    /// standalone validator as well.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, CoreError> {
        let issues = snapshot.schema_issues();
        if !issues.is_empty() {
            return Err(CoreError::SchemaInvalid { issues });
        }

        let nodes: IndexMap<_, _> = snapshot
            .nodes
            .into_iter()
            .map(|n| (n.id.clone(), n))
            .collect();
        let edges: IndexMap<_, _> = snapshot
            .edges
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();

        Ok(FlowGraph::from_parts(snapshot.id, snapshot.name, nodes, edges))
    }

    /// Exports the whole graph in wire shape.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            id: self.id().map(str::to_string),
            name: self.name().to_string(),
            nodes: self.nodes().cloned().collect(),
            edges: self.edges().cloned().collect(),
        }
    }
}

impl From<FlowGraph> for GraphSnapshot {
    fn from(graph: FlowGraph) -> Self {
        graph.to_snapshot()
    }
}

impl TryFrom<GraphSnapshot> for FlowGraph {
    type Error = CoreError;

    fn try_from(snapshot: GraphSnapshot) -> Result<Self, Self::Error> {
        FlowGraph::from_snapshot(snapshot)
    }
}
