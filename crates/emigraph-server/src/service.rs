//! GraphService: the single coordinator between HTTP handlers and the
//! engine and storage crates.
//!
//! All business logic flows through [`GraphService`]. Handlers are thin
//! wrappers that delegate to these methods. Writes go through the admission
//! gate before they reach the store; loads are optionally re-validated.

use emigraph_check::{admit, review};
use emigraph_core::{FlowGraph, GraphSnapshot};
use emigraph_storage::{
    GraphId, GraphStore, GraphSummary, InMemoryStore, Revision, SqliteStore, StoredGraph,
};
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::schema::graphs::GraphResponse;
use crate::schema::mutations::{ApplyMutationsRequest, ApplyMutationsResponse};
use crate::schema::validate::ValidateResponse;

/// The central service coordinating graph storage, admission, and edits.
pub struct GraphService {
    store: Box<dyn GraphStore + Send>,
    revalidate_on_read: bool,
}

impl GraphService {
    /// Creates a service backed by the store `config` selects.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let store: Box<dyn GraphStore + Send> = if config.in_memory() {
            Box::new(InMemoryStore::new())
        } else {
            Box::new(SqliteStore::new(&config.db_path)?)
        };
        info!(db_path = %config.db_path, "opened graph store");
        Ok(Self::with_store(store, config.revalidate_on_read))
    }

    /// Creates a service with an in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(InMemoryStore::new()), true)
    }

    pub fn with_store(store: Box<dyn GraphStore + Send>, revalidate_on_read: bool) -> Self {
        GraphService {
            store,
            revalidate_on_read,
        }
    }

    /// Admits and stores a new graph. The snapshot's own `id` is ignored.
    pub fn create_graph(&mut self, snapshot: GraphSnapshot) -> Result<StoredGraph, ApiError> {
        let graph = admit(snapshot)?;
        Ok(self.store.create(graph.to_snapshot())?)
    }

    pub fn list_graphs(&self) -> Result<Vec<GraphSummary>, ApiError> {
        Ok(self.store.list()?)
    }

    /// Loads a stored graph, re-validating it when configured to.
    pub fn get_graph(&self, id: &GraphId) -> Result<GraphResponse, ApiError> {
        let graph = self.store.get(id)?;
        let findings = if self.revalidate_on_read {
            let findings = review(&graph.snapshot).details();
            if !findings.is_empty() {
                warn!(graph = %id, findings = findings.len(), "stored graph fails validation");
            }
            findings
        } else {
            Vec::new()
        };
        Ok(GraphResponse { graph, findings })
    }

    /// Admits a snapshot and replaces the stored graph with it.
    pub fn replace_graph(
        &mut self,
        id: &GraphId,
        snapshot: GraphSnapshot,
        expected: Option<&Revision>,
    ) -> Result<StoredGraph, ApiError> {
        let graph = admit(snapshot)?;
        Ok(self.store.update(id, graph.to_snapshot(), expected)?)
    }

    pub fn delete_graph(&mut self, id: &GraphId) -> Result<(), ApiError> {
        Ok(self.store.delete(id)?)
    }

    /// Applies a mutation batch to a stored graph.
    ///
    /// The batch is all-or-nothing. A rejected batch, a dry run, and a
    /// stale `expected_revision` all leave the store untouched.
    pub fn apply_mutations(
        &mut self,
        id: &GraphId,
        req: ApplyMutationsRequest,
    ) -> Result<ApplyMutationsResponse, ApiError> {
        let stored = self.store.get(id)?;
        if let Some(expected) = &req.expected_revision {
            if expected != &stored.revision {
                return Err(ApiError::Conflict(format!(
                    "graph {id} is at revision {}, not {expected}",
                    stored.revision
                )));
            }
        }

        let mut graph = self.load(&stored)?;
        let outcome = graph.apply_batch(&req.mutations)?;
        let snapshot = graph.to_snapshot();

        if req.dry_run {
            return Ok(ApplyMutationsResponse {
                committed: false,
                revision: stored.revision,
                outcome,
                graph: snapshot,
            });
        }

        // The write path validates every candidate, edits included.
        let findings = review(&snapshot);
        if !findings.is_empty() {
            return Err(findings.into());
        }
        let updated = self.store.update(id, snapshot, Some(&stored.revision))?;
        Ok(ApplyMutationsResponse {
            committed: true,
            revision: updated.revision,
            outcome,
            graph: updated.snapshot,
        })
    }

    /// Runs the standalone validator on any snapshot.
    pub fn validate(&self, snapshot: &GraphSnapshot) -> ValidateResponse {
        let findings = review(snapshot);
        ValidateResponse {
            valid: findings.is_empty(),
            details: findings.details(),
            violations: findings.violations,
        }
    }

    fn load(&self, stored: &StoredGraph) -> Result<FlowGraph, ApiError> {
        let snapshot = stored.snapshot.clone();
        let loaded = if self.revalidate_on_read {
            admit(snapshot).map_err(|rejection| {
                warn!(graph = %stored.id, findings = rejection.details().len(), "stored graph fails validation");
                rejection.to_string()
            })
        } else {
            FlowGraph::from_snapshot(snapshot).map_err(|err| err.to_string())
        };
        loaded.map_err(|reason| {
            ApiError::InternalError(format!("stored graph {} cannot be edited: {reason}", stored.id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emigraph_core::{Edge, Mutation, Node, NodeId, NodePatch};

    fn plant() -> GraphSnapshot {
        GraphSnapshot {
            id: None,
            name: "plant".into(),
            nodes: vec![Node::new("a", "A", 100.0, 50.0), Node::new("b", "B", 50.0, 0.0)],
            edges: Vec::new(),
        }
    }

    fn add_edge() -> Mutation {
        Mutation::AddEdge {
            id: "ab".into(),
            source: "a".into(),
            target: "b".into(),
            weight: 50.0,
        }
    }

    fn request(mutations: Vec<Mutation>, dry_run: bool) -> ApplyMutationsRequest {
        ApplyMutationsRequest {
            mutations,
            dry_run,
            expected_revision: None,
        }
    }

    #[test]
    fn create_refuses_inconsistent_snapshots() {
        let mut service = GraphService::in_memory();
        let mut snapshot = plant();
        snapshot.edges.push(Edge::new("ab", "a", "b", 50.0));

        let err = service.create_graph(snapshot).unwrap_err();
        match err {
            ApiError::ValidationFailed(details) => {
                assert!(details.iter().any(|d| d.kind == "emissionsMismatch"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
        assert!(service.list_graphs().unwrap().is_empty());
    }

    #[test]
    fn mutations_are_persisted_unless_dry_run() {
        let mut service = GraphService::in_memory();
        let stored = service.create_graph(plant()).unwrap();

        let preview = service
            .apply_mutations(&stored.id, request(vec![add_edge()], true))
            .unwrap();
        assert!(!preview.committed);
        assert_eq!(preview.revision, stored.revision);
        assert_eq!(preview.graph.edges[0].emissions, 25.0);
        assert!(service.get_graph(&stored.id).unwrap().graph.snapshot.edges.is_empty());

        let applied = service
            .apply_mutations(&stored.id, request(vec![add_edge()], false))
            .unwrap();
        assert!(applied.committed);
        assert_ne!(applied.revision, stored.revision);
        let loaded = service.get_graph(&stored.id).unwrap();
        assert!(loaded.findings.is_empty());
        assert_eq!(loaded.graph.snapshot.edges[0].emissions, 25.0);
        assert_eq!(loaded.graph.snapshot.nodes[1].emissions, 25.0);
    }

    #[test]
    fn rejected_batch_leaves_the_store_untouched() {
        let mut service = GraphService::in_memory();
        let stored = service.create_graph(plant()).unwrap();

        let batch = vec![
            add_edge(),
            Mutation::UpdateNode {
                id: NodeId::from("b"),
                patch: NodePatch::default().emissions(1.0),
            },
        ];
        let err = service
            .apply_mutations(&stored.id, request(batch, false))
            .unwrap_err();
        assert!(matches!(err, ApiError::EditRejected { code: "BUDGET_EXCEEDED", .. }));
        assert_eq!(service.get_graph(&stored.id).unwrap().graph, stored);
    }

    #[test]
    fn stale_revision_is_a_conflict() {
        let mut service = GraphService::in_memory();
        let stored = service.create_graph(plant()).unwrap();
        let mut req = request(vec![add_edge()], false);
        req.expected_revision = Some(Revision("stale".into()));

        let err = service.apply_mutations(&stored.id, req).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn validate_reports_without_rejecting() {
        let service = GraphService::in_memory();
        let mut snapshot = plant();
        snapshot.edges.push(Edge::new("ab", "a", "b", 500.0));

        let response = service.validate(&snapshot);
        assert!(!response.valid);
        assert!(response.details.iter().any(|d| d.kind == "weightBudget"));
        assert!(service.validate(&plant()).valid);
    }
}
