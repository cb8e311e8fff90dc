//! Standalone validation handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use emigraph_core::GraphSnapshot;

use crate::error::ApiError;
use crate::schema::validate::ValidateResponse;
use crate::state::AppState;

/// Runs the validator on a posted snapshot. Findings are returned with
/// status 200; only an unreadable body is an error.
///
/// `POST /validate`
pub async fn validate(
    State(state): State<AppState>,
    body: Result<Json<GraphSnapshot>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let Json(snapshot) = body?;
    let service = state.service.lock().await;
    Ok(Json(service.validate(&snapshot)))
}
