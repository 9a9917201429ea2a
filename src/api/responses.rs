//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::TimerError,
    state::{ClockId, GroupFilter},
    view::{Projection, TimerView},
};

/// Response for state-changing endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ClockId>,
    pub projection: Projection,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: &str, message: String, projection: Projection) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            id: None,
            projection,
        }
    }

    /// The change was applied
    pub fn ok(message: String, projection: Projection) -> Self {
        Self::new("ok", message, projection)
    }

    /// The target did not exist, nothing changed
    pub fn ignored(message: String, projection: Projection) -> Self {
        Self::new("ignored", message, projection)
    }

    pub fn with_id(mut self, id: ClockId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Body for renaming or regrouping a timer
#[derive(Debug, Clone, Deserialize)]
pub struct EditRequest {
    pub name: String,
    pub group: String,
}

/// Body for choosing the active filter
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRequest {
    pub group: GroupFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<String>,
    pub filter: GroupFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditSessionResponse {
    pub editing: Option<TimerView>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportParams {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub status: String,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub timers: usize,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

/// Maps registry errors onto HTTP status codes
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            TimerError::Malformed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorBody {
            status: "error",
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
