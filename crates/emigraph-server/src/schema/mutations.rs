//! Mutation request/response types.
//!
//! The request carries [`Mutation`]s in their tagged wire form, e.g.
//! `{"type": "AddEdge", "id": "ab", "source": "a", "target": "b", "weight": 50}`.

use emigraph_core::{GraphSnapshot, Mutation, MutationOutcome};
use emigraph_storage::Revision;
use serde::{Deserialize, Serialize};

/// Request to apply a batch of mutations to a stored graph.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyMutationsRequest {
    /// The edits, applied in order; all of them or none.
    pub mutations: Vec<Mutation>,
    /// When true, compute the result without persisting it.
    #[serde(default)]
    pub dry_run: bool,
    /// Refuse the batch if the stored graph is no longer at this revision.
    #[serde(default)]
    pub expected_revision: Option<Revision>,
}

/// Result of an accepted batch.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyMutationsResponse {
    /// Whether the result was persisted (false for dry runs).
    pub committed: bool,
    /// Revision of the stored graph after the call.
    pub revision: Revision,
    /// Entities created, changed, or removed by the batch.
    pub outcome: MutationOutcome,
    /// The resulting graph.
    pub graph: GraphSnapshot,
}
