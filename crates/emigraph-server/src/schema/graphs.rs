//! Graph management request/response types.

use emigraph_check::Detail;
use emigraph_core::GraphSnapshot;
use emigraph_storage::{GraphSummary, Revision, StoredGraph};
use serde::{Deserialize, Serialize};

/// Request to replace a stored graph.
///
/// The body is a snapshot with an optional `expected_revision`; when given,
/// the write is refused if the graph changed since that revision was read.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceGraphRequest {
    #[serde(flatten)]
    pub snapshot: GraphSnapshot,
    #[serde(default)]
    pub expected_revision: Option<Revision>,
}

/// A loaded graph.
#[derive(Debug, Clone, Serialize)]
pub struct GraphResponse {
    #[serde(flatten)]
    pub graph: StoredGraph,
    /// Findings of the re-validation on read. Empty for a healthy graph.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Detail>,
}

/// Response for listing all graphs.
#[derive(Debug, Clone, Serialize)]
pub struct GraphListResponse {
    pub graphs: Vec<GraphSummary>,
}
