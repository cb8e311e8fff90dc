//! The [`GraphStore`] trait defining the storage contract for graphs.
//!
//! Stores persist whole snapshots and never look inside them: checking a
//! snapshot before it is written is the caller's job (the server runs the
//! admission gate). All backends implement this trait, so they are fully
//! swappable.

use emigraph_core::GraphSnapshot;

use crate::error::StorageError;
use crate::types::{GraphId, GraphSummary, Revision, StoredGraph};

/// The storage contract for graph snapshots.
///
/// The trait is synchronous; callers serialize access to one store.
pub trait GraphStore {
    /// Stores a new graph under a freshly allocated [`GraphId`].
    fn create(&mut self, snapshot: GraphSnapshot) -> Result<StoredGraph, StorageError>;

    /// Loads a stored graph.
    fn get(&self, id: &GraphId) -> Result<StoredGraph, StorageError>;

    /// Lists all stored graphs, oldest first.
    fn list(&self) -> Result<Vec<GraphSummary>, StorageError>;

    /// Replaces a stored graph's snapshot.
    ///
    /// When `expected` is given and differs from the stored revision the
    /// write is refused with [`StorageError::RevisionConflict`].
    fn update(
        &mut self,
        id: &GraphId,
        snapshot: GraphSnapshot,
        expected: Option<&Revision>,
    ) -> Result<StoredGraph, StorageError>;

    /// Deletes a stored graph.
    fn delete(&mut self, id: &GraphId) -> Result<(), StorageError>;
}
