//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Local;
use tracing::info;

use crate::{
    state::{AppState, ClockId, NewTimer},
    storage::export_file_name,
    view::Projection,
};
use super::responses::{
    ApiError, ApiResponse, EditRequest, EditSessionResponse, FilterRequest, GroupsResponse,
    HealthResponse, ImportParams, ImportResponse,
};

type ApiResult<T> = Result<T, ApiError>;

/// Handle GET /timers - Current projection for the active filter
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Json<Projection> {
    Json(state.projection())
}

/// Handle POST /timers - Add a timer
pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewTimer>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let name = new.name.clone();
    let id = state.add(new)?;
    info!("Add endpoint called - timer {} created", id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(format!("Timer '{}' added", name.trim()), state.projection()).with_id(id)),
    ))
}

/// Handle PATCH /timers/:id - Rename or regroup a timer
pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<EditRequest>,
) -> ApiResult<Json<ApiResponse>> {
    let id = ClockId::from(id);
    let applied = state.edit(&id, &req.name, &req.group)?;
    Ok(Json(outcome(applied, "updated", id, state.projection())))
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    let id = ClockId::from(id);
    let applied = state.remove(&id)?;
    Ok(Json(outcome(applied, "removed", id, state.projection())))
}

/// Handle POST /timers/:id/toggle - Flip the checked marker
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse>> {
    let id = ClockId::from(id);
    let applied = state.toggle_checked(&id)?;
    Ok(Json(outcome(applied, "toggled", id, state.projection())))
}

fn outcome(applied: bool, verb: &str, id: ClockId, projection: Projection) -> ApiResponse {
    let response = if applied {
        ApiResponse::ok(format!("Timer {} {}", id, verb), projection)
    } else {
        ApiResponse::ignored(format!("No timer {}", id), projection)
    };
    response.with_id(id)
}

/// Handle GET /groups - Distinct group labels and the active filter
pub async fn groups_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<GroupsResponse>> {
    Ok(Json(GroupsResponse {
        groups: state.groups()?,
        filter: state.filter()?,
    }))
}

/// Handle PUT /filter - Choose which group the projection shows
pub async fn filter_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilterRequest>,
) -> ApiResult<Json<ApiResponse>> {
    let message = format!("Filter set to {}", req.group);
    state.set_filter(req.group)?;
    Ok(Json(ApiResponse::ok(message, state.projection())))
}

/// Handle POST /editing/:id - Open an edit session
pub async fn begin_edit_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EditSessionResponse>> {
    let editing = state.begin_edit(&ClockId::from(id))?;
    Ok(Json(EditSessionResponse { editing }))
}

/// Handle PUT /editing - Apply and close the edit session
pub async fn commit_edit_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EditRequest>,
) -> ApiResult<Json<ApiResponse>> {
    let response = if state.commit_edit(&req.name, &req.group)? {
        ApiResponse::ok("Edit applied".to_string(), state.projection())
    } else {
        ApiResponse::ignored("No edit in progress".to_string(), state.projection())
    };
    Ok(Json(response))
}

/// Handle DELETE /editing - Close the edit session without changes
pub async fn cancel_edit_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.cancel_edit()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /export - Download every timer as JSON
pub async fn export_handler(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let document = state.export()?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Local::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    ))
}

/// Handle POST /import - Preview, or with `confirm=true` apply, an import
pub async fn import_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ImportParams>,
    body: String,
) -> ApiResult<Json<ImportResponse>> {
    let response = if params.confirm {
        ImportResponse {
            status: "imported".to_string(),
            count: state.import(&body)?,
        }
    } else {
        ImportResponse {
            status: "preview".to_string(),
            count: state.preview_import(&body)?,
        }
    };
    Ok(Json(response))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let (last_action, last_action_time) = state.get_last_action();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timers: state.timer_count()?,
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    }))
}
