//! Router assembly for the emigraph HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive (the
/// editor may be served from any origin). TraceLayer provides request-level
/// logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/graphs",
            get(handlers::graphs::list_graphs).post(handlers::graphs::create_graph),
        )
        .route(
            "/graphs/{id}",
            get(handlers::graphs::get_graph)
                .put(handlers::graphs::replace_graph)
                .delete(handlers::graphs::delete_graph),
        )
        .route(
            "/graphs/{id}/mutations",
            post(handlers::mutations::apply_mutations),
        )
        .route("/validate", post(handlers::validate::validate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
