//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(list_handler).post(add_handler))
        .route("/timers/:id", patch(edit_handler).delete(remove_handler))
        .route("/timers/:id/toggle", post(toggle_handler))
        .route("/groups", get(groups_handler))
        .route("/filter", put(filter_handler))
        .route("/editing/:id", post(begin_edit_handler))
        .route("/editing", put(commit_edit_handler).delete(cancel_edit_handler))
        .route("/export", get(export_handler))
        .route("/import", post(import_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
