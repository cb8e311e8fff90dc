//! Storage-layer types for graph identity and metadata.
//!
//! [`GraphId`] lives here rather than in emigraph-core because graph
//! identity is a storage concern: a graph only gains an id when persisted.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use emigraph_core::GraphSnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a stored graph (a UUID v4 string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(pub String);

impl GraphId {
    /// Allocates a fresh random id.
    pub fn generate() -> Self {
        GraphId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GraphId {
    fn from(s: &str) -> Self {
        GraphId(s.to_string())
    }
}

/// Content hash of a stored snapshot, see [`crate::hash::revision_of`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(pub String);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Summary of a stored graph (for listing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub id: GraphId,
    pub name: String,
    pub revision: Revision,
    pub node_count: usize,
    pub edge_count: usize,
    pub created_at: i64,
    pub updated_at: i64,
}

/// A stored graph with its bookkeeping.
///
/// `snapshot.id` always equals `id`. Timestamps are unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredGraph {
    pub id: GraphId,
    pub name: String,
    pub snapshot: GraphSnapshot,
    pub revision: Revision,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StoredGraph {
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            revision: self.revision.clone(),
            node_count: self.snapshot.nodes.len(),
            edge_count: self.snapshot.edges.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Current time in unix milliseconds.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
