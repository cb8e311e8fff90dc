//! Application state with a shared `GraphService`.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers, so handlers await the lock without blocking the runtime.
//! `SqliteStore` holds a `rusqlite::Connection`, which is `!Sync`, so a
//! `RwLock` is not an option. The mutex also serializes edits of one graph,
//! which the engine requires of its callers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::service::GraphService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<tokio::sync::Mutex<GraphService>>,
}

impl AppState {
    /// Creates a new `AppState` with the store `config` selects.
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        Ok(Self::from_service(GraphService::new(config)?))
    }

    /// Creates a new `AppState` with an in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::from_service(GraphService::in_memory())
    }

    pub fn from_service(service: GraphService) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        }
    }
}
