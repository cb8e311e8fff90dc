//! Storage error types for emigraph-storage.
//!
//! [`StorageError`] covers every failure mode of a [`crate::GraphStore`]:
//! serialization, the SQLite backend, migrations, unknown graph ids, and
//! optimistic concurrency conflicts.

use thiserror::Error;

use crate::types::{GraphId, Revision};

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The SQLite backend reported an error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No graph is stored under the given id.
    #[error("graph not found: {0}")]
    GraphNotFound(GraphId),

    /// The caller's expected revision is stale.
    #[error("revision conflict on graph {id}: expected {expected}, stored {actual}")]
    RevisionConflict {
        id: GraphId,
        expected: Revision,
        actual: Revision,
    },
}
