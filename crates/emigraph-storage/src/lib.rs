//! Storage abstraction for emission graph snapshots.
//!
//! [`GraphStore`] is the contract every backend honours. Two backends ship
//! here: [`InMemoryStore`] for tests and throwaway sessions, and
//! [`SqliteStore`] for durable storage in a single file.
//!
//! Stores persist whole snapshots and report a content [`Revision`] with
//! every record, which callers pass back on update for optimistic
//! concurrency control.
//!
//! # Modules
//!
//! - [`error`]: StorageError
//! - [`types`]: GraphId, Revision, GraphSummary, StoredGraph
//! - [`traits`]: the GraphStore contract
//! - [`hash`]: blake3 content revisions
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: connection setup and migrations
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod hash;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use error::StorageError;
pub use hash::revision_of;
pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;
pub use traits::GraphStore;
pub use types::{GraphId, GraphSummary, Revision, StoredGraph};
