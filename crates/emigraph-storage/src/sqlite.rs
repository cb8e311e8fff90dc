//! SQLite implementation of [`GraphStore`].
//!
//! [`SqliteStore`] persists each graph as one row holding the snapshot as a
//! JSON TEXT column, plus the bookkeeping needed for listing without
//! parsing snapshots. Every write runs in a transaction.

use emigraph_core::GraphSnapshot;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::error::StorageError;
use crate::hash::prepare;
use crate::traits::GraphStore;
use crate::types::{now_millis, GraphId, GraphSummary, Revision, StoredGraph};

/// SQLite-backed implementation of [`GraphStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    fn read_stored(row: &Row<'_>) -> rusqlite::Result<(String, String, String, String, i64, i64)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }
}

impl GraphStore for SqliteStore {
    fn create(&mut self, snapshot: GraphSnapshot) -> Result<StoredGraph, StorageError> {
        let id = GraphId::generate();
        let (snapshot, revision) = prepare(&id, snapshot)?;
        let json = serde_json::to_string(&snapshot)?;
        let now = now_millis();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO graphs (id, name, snapshot, revision, node_count, edge_count, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                id.as_str(),
                snapshot.name,
                json,
                revision.0,
                snapshot.nodes.len() as i64,
                snapshot.edges.len() as i64,
                now
            ],
        )?;
        tx.commit()?;
        debug!(graph = %id, "created graph");

        Ok(StoredGraph {
            id,
            name: snapshot.name.clone(),
            snapshot,
            revision,
            created_at: now,
            updated_at: now,
        })
    }

    fn get(&self, id: &GraphId) -> Result<StoredGraph, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, snapshot, revision, created_at, updated_at FROM graphs WHERE id = ?1",
                params![id.as_str()],
                Self::read_stored,
            )
            .optional()?;
        let (id, name, json, revision, created_at, updated_at) =
            row.ok_or_else(|| StorageError::GraphNotFound(id.clone()))?;

        Ok(StoredGraph {
            id: GraphId(id),
            name,
            snapshot: serde_json::from_str(&json)?,
            revision: Revision(revision),
            created_at,
            updated_at,
        })
    }

    fn list(&self) -> Result<Vec<GraphSummary>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, revision, node_count, edge_count, created_at, updated_at
             FROM graphs ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map([], |row| {
            let node_count: i64 = row.get(3)?;
            let edge_count: i64 = row.get(4)?;
            Ok(GraphSummary {
                id: GraphId(row.get(0)?),
                name: row.get(1)?,
                revision: Revision(row.get(2)?),
                node_count: node_count as usize,
                edge_count: edge_count as usize,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn update(
        &mut self,
        id: &GraphId,
        snapshot: GraphSnapshot,
        expected: Option<&Revision>,
    ) -> Result<StoredGraph, StorageError> {
        let (snapshot, revision) = prepare(id, snapshot)?;
        let json = serde_json::to_string(&snapshot)?;

        let tx = self.conn.transaction()?;
        let current: Option<(String, i64)> = tx
            .query_row(
                "SELECT revision, created_at FROM graphs WHERE id = ?1",
                params![id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let (actual, created_at) = current.ok_or_else(|| StorageError::GraphNotFound(id.clone()))?;
        if let Some(expected) = expected {
            if expected.0 != actual {
                return Err(StorageError::RevisionConflict {
                    id: id.clone(),
                    expected: expected.clone(),
                    actual: Revision(actual),
                });
            }
        }

        let updated_at = now_millis().max(created_at);
        tx.execute(
            "UPDATE graphs
             SET name = ?2, snapshot = ?3, revision = ?4, node_count = ?5, edge_count = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                id.as_str(),
                snapshot.name,
                json,
                revision.0,
                snapshot.nodes.len() as i64,
                snapshot.edges.len() as i64,
                updated_at
            ],
        )?;
        tx.commit()?;
        debug!(graph = %id, "updated graph");

        Ok(StoredGraph {
            id: id.clone(),
            name: snapshot.name.clone(),
            snapshot,
            revision,
            created_at,
            updated_at,
        })
    }

    fn delete(&mut self, id: &GraphId) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM graphs WHERE id = ?1", params![id.as_str()])?;
        if removed == 0 {
            return Err(StorageError::GraphNotFound(id.clone()));
        }
        tx.commit()?;
        debug!(graph = %id, "deleted graph");
        Ok(())
    }
}
