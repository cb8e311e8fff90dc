//! Edge types for the emission flow graph.
//!
//! An [`Edge`] routes a portion (`weight`) of its source node's weight to
//! the target node. Its `emissions` are derived from the source node with
//! [`edge_emissions`] and are never set independently: an edge carries the
//! share of the source's emissions that matches the share of the source's
//! weight it routes.

use serde::{Deserialize, Serialize};

use crate::id::{EdgeId, NodeId};

/// Absolute tolerance used whenever derived emissions are compared.
pub const EMISSIONS_TOLERANCE: f64 = 1e-4;

/// The defining formula for an edge's emissions:
/// `(edge weight / source weight) * source emissions`.
///
/// The ratio is the routed fraction, edge over source. The inverse,
/// `source weight / edge weight`, would exceed the source's emissions for
/// any partial edge and is not used anywhere.
///
/// Every place that derives or verifies edge emissions goes through this
/// function so the editor path and the validator cannot disagree.
pub fn edge_emissions(source_weight: f64, source_emissions: f64, edge_weight: f64) -> f64 {
    (edge_weight / source_weight) * source_emissions
}

/// A directed edge of the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    /// Portion of the source node's weight routed along this edge. `> 0`.
    pub weight: f64,
    /// Derived emissions, see [`edge_emissions`].
    pub emissions: f64,
}

impl Edge {
    /// Creates an edge with zero emissions. The Mutation API derives the
    /// real value when the edge is added.
    pub fn new(
        id: impl Into<EdgeId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        weight: f64,
    ) -> Self {
        Edge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            weight,
            emissions: 0.0,
        }
    }
}

/// A partial update for [`Edge`]. Only the target and the weight can be
/// patched; emissions follow from the formula and the source is fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl EdgePatch {
    pub fn target(mut self, target: impl Into<NodeId>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_scales_source_emissions_by_routed_share() {
        // Half of the weight carries half of the emissions.
        assert_eq!(edge_emissions(100.0, 50.0, 50.0), 25.0);
        assert_eq!(edge_emissions(100.0, 100.0, 50.0), 50.0);
        assert_eq!(edge_emissions(100.0, 50.0, 100.0), 50.0);
        assert_eq!(edge_emissions(10.0, 0.0, 3.0), 0.0);
    }

    #[test]
    fn new_edge_starts_without_emissions() {
        let edge = Edge::new("e1", "a", "b", 5.0);
        assert_eq!(edge.emissions, 0.0);
        assert_eq!(edge.source, NodeId::from("a"));
    }

    #[test]
    fn edge_wire_shape() {
        let edge: Edge = serde_json::from_str(
            r#"{"id":"e1","source":"a","target":"b","weight":2,"emissions":1.5}"#,
        )
        .unwrap();
        assert_eq!(edge.target, NodeId::from("b"));
        assert_eq!(edge.emissions, 1.5);
    }
}
