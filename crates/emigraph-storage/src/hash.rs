//! Deterministic content revisions for stored snapshots using blake3.
//!
//! A revision identifies snapshot content, not storage identity: the
//! snapshot's `id` is left out, so the same graph content always hashes the
//! same no matter where it is stored. Serialization is canonical because
//! snapshots hold only `Vec`s and structs (no `HashMap`).

use emigraph_core::GraphSnapshot;

use crate::error::StorageError;
use crate::types::{GraphId, Revision};

/// Computes the revision of `snapshot`'s content.
pub fn revision_of(snapshot: &GraphSnapshot) -> Result<Revision, StorageError> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(snapshot.name.as_bytes());
    hasher.update(&[0]);
    hasher.update(&serde_json::to_vec(&snapshot.nodes)?);
    hasher.update(&[0]);
    hasher.update(&serde_json::to_vec(&snapshot.edges)?);
    Ok(Revision(hasher.finalize().to_hex().to_string()))
}

/// Stamps `snapshot` with its storage id and computes its revision.
pub(crate) fn prepare(
    id: &GraphId,
    mut snapshot: GraphSnapshot,
) -> Result<(GraphSnapshot, Revision), StorageError> {
    snapshot.id = Some(id.to_string());
    let revision = revision_of(&snapshot)?;
    Ok((snapshot, revision))
}
