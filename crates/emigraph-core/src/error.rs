//! Core error types for emigraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering every
//! way a Mutation API call or a snapshot admission can be refused. A
//! returned error always means the graph was left untouched.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::NodeId;

/// Which budget invariant an edit would break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetKind {
    /// Outbound edge weights would exceed the node's weight.
    Weight,
    /// The node's emissions would fall below its inbound edge emissions.
    Emissions,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetKind::Weight => f.write_str("weight"),
            BudgetKind::Emissions => f.write_str("emissions"),
        }
    }
}

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Node,
    Edge,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Node => f.write_str("node"),
            EntityKind::Edge => f.write_str("edge"),
        }
    }
}

/// Errors produced by the Mutation API and snapshot admission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Adding or retargeting an edge `from -> to` would close a cycle.
    #[error("edge {from} -> {to} would create a cycle")]
    CycleDetected { from: NodeId, to: NodeId },

    /// An edit would violate a weight or emissions budget at `node`.
    #[error("{kind} budget exceeded at node {node}")]
    BudgetExceeded { kind: BudgetKind, node: NodeId },

    /// An operation referenced an id that does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// An entity with this id already exists.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: EntityKind, id: String },

    /// A snapshot or a new entity failed basic structural checks.
    #[error("schema invalid: {}", .issues.join("; "))]
    SchemaInvalid { issues: Vec<String> },
}

/// A mutation batch was refused. Carries the position of the mutation that
/// failed; none of the batch was applied.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("mutation {index} rejected: {error}")]
pub struct BatchError {
    pub index: usize,
    #[source]
    pub error: CoreError,
}

impl CoreError {
    pub(crate) fn node_not_found(id: &NodeId) -> Self {
        CoreError::NotFound {
            kind: EntityKind::Node,
            id: id.to_string(),
        }
    }

    pub(crate) fn edge_not_found(id: impl fmt::Display) -> Self {
        CoreError::NotFound {
            kind: EntityKind::Edge,
            id: id.to_string(),
        }
    }

    pub(crate) fn schema(issue: impl Into<String>) -> Self {
        CoreError::SchemaInvalid {
            issues: vec![issue.into()],
        }
    }
}
