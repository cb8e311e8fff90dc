//! In-memory implementation of [`GraphStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests, ephemeral sessions,
//! and anywhere persistence isn't needed. It has identical semantics to the
//! SQLite backend.

use std::collections::HashMap;

use emigraph_core::GraphSnapshot;
use tracing::debug;

use crate::error::StorageError;
use crate::hash::prepare;
use crate::traits::GraphStore;
use crate::types::{now_millis, GraphId, GraphSummary, Revision, StoredGraph};

/// In-memory graph store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    graphs: HashMap<GraphId, StoredGraph>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GraphStore for InMemoryStore {
    fn create(&mut self, snapshot: GraphSnapshot) -> Result<StoredGraph, StorageError> {
        let id = GraphId::generate();
        let (snapshot, revision) = prepare(&id, snapshot)?;
        let now = now_millis();
        let stored = StoredGraph {
            id: id.clone(),
            name: snapshot.name.clone(),
            snapshot,
            revision,
            created_at: now,
            updated_at: now,
        };
        self.graphs.insert(id.clone(), stored.clone());
        debug!(graph = %id, "created graph");
        Ok(stored)
    }

    fn get(&self, id: &GraphId) -> Result<StoredGraph, StorageError> {
        self.graphs
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::GraphNotFound(id.clone()))
    }

    fn list(&self) -> Result<Vec<GraphSummary>, StorageError> {
        let mut summaries: Vec<GraphSummary> = self.graphs.values().map(StoredGraph::summary).collect();
        summaries.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(summaries)
    }

    fn update(
        &mut self,
        id: &GraphId,
        snapshot: GraphSnapshot,
        expected: Option<&Revision>,
    ) -> Result<StoredGraph, StorageError> {
        let stored = self
            .graphs
            .get_mut(id)
            .ok_or_else(|| StorageError::GraphNotFound(id.clone()))?;
        if let Some(expected) = expected {
            if expected != &stored.revision {
                return Err(StorageError::RevisionConflict {
                    id: id.clone(),
                    expected: expected.clone(),
                    actual: stored.revision.clone(),
                });
            }
        }

        let (snapshot, revision) = prepare(id, snapshot)?;
        stored.name = snapshot.name.clone();
        stored.snapshot = snapshot;
        stored.revision = revision;
        stored.updated_at = now_millis().max(stored.created_at);
        debug!(graph = %id, "updated graph");
        Ok(stored.clone())
    }

    fn delete(&mut self, id: &GraphId) -> Result<(), StorageError> {
        self.graphs
            .remove(id)
            .ok_or_else(|| StorageError::GraphNotFound(id.clone()))?;
        debug!(graph = %id, "deleted graph");
        Ok(())
    }
}
