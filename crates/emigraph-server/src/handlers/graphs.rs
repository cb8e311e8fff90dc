//! Graph management handlers (create, list, get, replace, delete).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use emigraph_core::GraphSnapshot;
use emigraph_storage::{GraphId, StoredGraph};

use crate::error::ApiError;
use crate::schema::graphs::{GraphListResponse, GraphResponse, ReplaceGraphRequest};
use crate::state::AppState;

/// Lists all graphs.
///
/// `GET /graphs`
pub async fn list_graphs(
    State(state): State<AppState>,
) -> Result<Json<GraphListResponse>, ApiError> {
    let service = state.service.lock().await;
    let graphs = service.list_graphs()?;
    Ok(Json(GraphListResponse { graphs }))
}

/// Validates and stores a new graph.
///
/// `POST /graphs`
pub async fn create_graph(
    State(state): State<AppState>,
    body: Result<Json<GraphSnapshot>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredGraph>), ApiError> {
    let Json(snapshot) = body?;
    let mut service = state.service.lock().await;
    let stored = service.create_graph(snapshot)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Loads a graph.
///
/// `GET /graphs/{id}`
pub async fn get_graph(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GraphResponse>, ApiError> {
    let service = state.service.lock().await;
    let response = service.get_graph(&GraphId(id))?;
    Ok(Json(response))
}

/// Validates a snapshot and replaces the stored graph with it.
///
/// `PUT /graphs/{id}`
pub async fn replace_graph(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ReplaceGraphRequest>, JsonRejection>,
) -> Result<Json<StoredGraph>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    let stored = service.replace_graph(&GraphId(id), req.snapshot, req.expected_revision.as_ref())?;
    Ok(Json(stored))
}

/// Deletes a graph.
///
/// `DELETE /graphs/{id}`
pub async fn delete_graph(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut service = state.service.lock().await;
    service.delete_graph(&GraphId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
