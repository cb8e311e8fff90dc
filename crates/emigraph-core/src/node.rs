//! Node types for the emission flow graph.
//!
//! A [`Node`] is a stage that holds a quantity (`weight`) and the emissions
//! attributed to it. Only `weight` and `emissions` take part in the graph
//! invariants; `name` and `position` are presentation data carried through
//! unchanged.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Canvas coordinates of a node. Presentation-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Total capacity available to be routed through outgoing edges. `> 0`.
    pub weight: f64,
    /// Total emissions attributed to this node. Never below the sum of
    /// emissions arriving over incoming edges.
    pub emissions: f64,
    #[serde(default)]
    pub position: Position,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, weight: f64, emissions: f64) -> Self {
        Node {
            id: id.into(),
            name: name.into(),
            weight,
            emissions,
            position: Position::default(),
        }
    }

    /// Builder-style setter for the canvas position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position { x, y };
        self
    }
}

/// A partial update for [`Node`]. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissions: Option<f64>,
}

impl NodePatch {
    /// Returns `true` if the patch only touches fields without invariants.
    pub fn is_presentation_only(&self) -> bool {
        self.weight.is_none() && self.emissions.is_none()
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn emissions(mut self, emissions: f64) -> Self {
        self.emissions = Some(emissions);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_defaults_when_missing() {
        let node: Node = serde_json::from_str(
            r#"{"id":"a","name":"A","weight":100,"emissions":50}"#,
        )
        .unwrap();
        assert_eq!(node.position, Position { x: 0.0, y: 0.0 });
        assert_eq!(node.weight, 100.0);
    }

    #[test]
    fn presentation_patch_detection() {
        assert!(NodePatch::default().name("Kiln").position(3.0, 4.0).is_presentation_only());
        assert!(!NodePatch::default().weight(2.0).is_presentation_only());
        assert!(!NodePatch::default().emissions(0.0).is_presentation_only());
    }

    #[test]
    fn patch_omits_absent_fields() {
        let json = serde_json::to_string(&NodePatch::default().emissions(5.0)).unwrap();
        assert_eq!(json, r#"{"emissions":5.0}"#);
    }
}
