//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use emigraph_check::{Detail, Rejection};
use emigraph_core::{BatchError, CoreError};
use emigraph_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CYCLE_DETECTED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured details (e.g., validator findings).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The snapshot failed the admission gate (400). Lists every finding.
    #[error("validation failed")]
    ValidationFailed(Vec<Detail>),

    /// An edit would break a graph invariant (409). The graph is unchanged.
    #[error("{message}")]
    EditRejected {
        code: &'static str,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Resource conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ApiErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "BAD_REQUEST".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::ValidationFailed(findings) => (
                StatusCode::BAD_REQUEST,
                ApiErrorDetail {
                    code: "VALIDATION_FAILED".to_string(),
                    message: format!("{} validation finding(s)", findings.len()),
                    details: serde_json::to_value(findings).ok(),
                },
            ),
            ApiError::EditRejected {
                code,
                message,
                details,
            } => (
                StatusCode::CONFLICT,
                ApiErrorDetail {
                    code: code.to_string(),
                    message,
                    details,
                },
            ),
            ApiError::Conflict(message) => (
                StatusCode::CONFLICT,
                ApiErrorDetail {
                    code: "CONFLICT".to_string(),
                    message,
                    details: None,
                },
            ),
            ApiError::InternalError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message,
                    details: None,
                },
            ),
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::NotFound { .. } => ApiError::NotFound(message),
            CoreError::CycleDetected { from, to } => ApiError::EditRejected {
                code: "CYCLE_DETECTED",
                message,
                details: Some(serde_json::json!({ "source": from, "target": to })),
            },
            CoreError::BudgetExceeded { kind, node } => ApiError::EditRejected {
                code: "BUDGET_EXCEEDED",
                message,
                details: Some(serde_json::json!({ "kind": kind, "node": node })),
            },
            CoreError::DuplicateId { kind, id } => ApiError::EditRejected {
                code: "DUPLICATE_ID",
                message,
                details: Some(serde_json::json!({ "kind": kind, "id": id })),
            },
            CoreError::SchemaInvalid { issues } => {
                ApiError::ValidationFailed(issues.into_iter().map(Detail::schema).collect())
            }
        }
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        let index = err.index;
        match ApiError::from(err.error) {
            ApiError::EditRejected {
                code,
                message,
                details,
            } => {
                let mut details = details.unwrap_or_else(|| serde_json::json!({}));
                details["index"] = serde_json::json!(index);
                ApiError::EditRejected {
                    code,
                    message: format!("mutation {index} rejected: {message}"),
                    details: Some(details),
                }
            }
            ApiError::NotFound(message) => {
                ApiError::NotFound(format!("mutation {index} rejected: {message}"))
            }
            other => other,
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        ApiError::ValidationFailed(rejection.details())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::GraphNotFound(_) => ApiError::NotFound(err.to_string()),
            StorageError::RevisionConflict { .. } => ApiError::Conflict(err.to_string()),
            _ => ApiError::InternalError(err.to_string()),
        }
    }
}

/// Malformed or mistyped bodies are reported as a schema finding.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationFailed(vec![Detail::schema(rejection.body_text())])
    }
}
