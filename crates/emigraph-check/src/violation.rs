//! Findings produced by the standalone validator.

use std::fmt;

use emigraph_core::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Which graph invariant a snapshot breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    /// The edges contain a directed cycle.
    Cycle,
    /// A node routes more weight than it has.
    WeightBudget,
    /// A node's emissions are below its inbound edge emissions.
    EmissionsBudget,
    /// An edge's emissions disagree with the formula.
    EmissionsMismatch,
}

impl ViolationKind {
    /// Wire name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Cycle => "cycle",
            ViolationKind::WeightBudget => "weightBudget",
            ViolationKind::EmissionsBudget => "emissionsBudget",
            ViolationKind::EmissionsMismatch => "emissionsMismatch",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where in the snapshot a violation was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum Location {
    Node(NodeId),
    Edge(EdgeId),
    /// The nodes of one cycle, sorted.
    Cycle(Vec<NodeId>),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Node(id) => write!(f, "node {id}"),
            Location::Edge(id) => write!(f, "edge {id}"),
            Location::Cycle(ids) => {
                let names: Vec<&str> = ids.iter().map(NodeId::as_str).collect();
                write!(f, "nodes {}", names.join(", "))
            }
        }
    }
}

/// One broken invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub location: Location,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, location: Location, message: impl Into<String>) -> Self {
        Violation {
            kind,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}
