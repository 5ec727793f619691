//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    controller::{Outcome, PendingDecision},
    error::{DispatchError, SessionError},
    state::Snapshot,
};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub pending: Option<PendingDecision>,
    pub state: Snapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, state: Snapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            pending: state.pending.clone(),
            state,
        }
    }

    /// Build the response for a dispatched command
    pub fn from_outcome(action: &str, outcome: Outcome, state: Snapshot) -> Self {
        match outcome {
            Outcome::Applied => Self::new("applied".to_string(), format!("{} applied", action), state),
            Outcome::Ignored => Self::new("ignored".to_string(), format!("{} changed nothing", action), state),
            Outcome::AwaitingConfirmation(_) => Self::new(
                "awaiting_confirmation".to_string(),
                format!("{} needs confirmation", action),
                state,
            ),
        }
    }
}

/// Error body returned with a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Handler error mapped onto an HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl From<DispatchError> for ApiError {
    fn from(error: DispatchError) -> Self {
        let code = match &error {
            DispatchError::Session(SessionError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            DispatchError::Session(SessionError::UnknownExercise(_)) => StatusCode::NOT_FOUND,
            DispatchError::Session(SessionError::IllegalTransition { .. })
            | DispatchError::Session(SessionError::NoPendingDecision) => StatusCode::CONFLICT,
            DispatchError::Lock(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            code,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.message,
            timestamp: Utc::now(),
        };
        (self.code, Json(body)).into_response()
    }
}

/// Body for `POST /session/reps`: a stepper delta or an inline edit
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RepsEdit {
    Delta { delta: i64 },
    Value { value: String },
}

/// Body for `POST /session/weight`: a stepper delta or an inline edit
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WeightEdit {
    Delta { delta: f64 },
    Value { value: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestAdjustRequest {
    pub seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

/// Status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub mode: String,
    pub exercise: Option<String>,
    pub rest_timer_active: bool,
    pub rest_remaining_seconds: u32,
    pub stopwatch_running: bool,
    pub stopwatch_seconds: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
