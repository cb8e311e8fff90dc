//! Mutation handler for editing stored graphs.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use emigraph_storage::GraphId;

use crate::error::ApiError;
use crate::schema::mutations::{ApplyMutationsRequest, ApplyMutationsResponse};
use crate::state::AppState;

/// Applies a batch of mutations to a stored graph.
///
/// `POST /graphs/{id}/mutations`
///
/// All batch, dry-run, and revision logic lives in
/// [`GraphService::apply_mutations`](crate::service::GraphService::apply_mutations).
pub async fn apply_mutations(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ApplyMutationsRequest>, JsonRejection>,
) -> Result<Json<ApplyMutationsResponse>, ApiError> {
    let Json(req) = body?;
    let mut service = state.service.lock().await;
    let response = service.apply_mutations(&GraphId(id), req)?;
    Ok(Json(response))
}
