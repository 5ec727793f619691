//! HTTP endpoint handlers
//!
//! Each handler maps one renderer callback onto a [`Command`] and answers
//! with the resulting snapshot.

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tracing::{debug, error};

use crate::{
    catalog::NewExercise,
    controller::{Command, SettingsForm},
    state::{AppState, TimerKind},
};
use super::responses::{
    ApiError, ApiResponse, HealthResponse, RenameRequest, RepsEdit, RestAdjustRequest,
    StatusResponse, WeightEdit,
};

type ApiResult = Result<Json<ApiResponse>, ApiError>;

/// Dispatch a command and wrap the outcome
fn run(state: &AppState, command: Command) -> ApiResult {
    let action = command.name();
    match state.dispatch(command) {
        Ok(dispatched) => Ok(Json(ApiResponse::from_outcome(
            action,
            dispatched.outcome,
            dispatched.snapshot,
        ))),
        Err(e) => {
            debug!("{} rejected: {}", action, e);
            Err(e.into())
        }
    }
}

/// Handle GET /state - Return the current snapshot
pub async fn state_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    let snapshot = state.snapshot().map_err(|e| {
        error!("Failed to read snapshot: {}", e);
        ApiError::from(e)
    })?;
    Ok(Json(ApiResponse::new("ok".to_string(), "current state".to_string(), snapshot)))
}

/// Handle GET /events - Stream a snapshot after every change
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let snapshot = rx.borrow_and_update().clone();
        let event = Event::default()
            .event("snapshot")
            .json_data(&snapshot)
            .unwrap_or_else(|e| {
                error!("Failed to encode snapshot: {}", e);
                Event::default().event("error")
            });
        Some((Ok(event), rx))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle POST /exercises - Create an exercise
pub async fn add_exercise_handler(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewExercise>,
) -> ApiResult {
    run(&state, Command::AddExercise(new))
}

/// Handle DELETE /exercises/:id - Ask to delete an exercise
pub async fn remove_exercise_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult {
    run(&state, Command::RequestRemove { id })
}

/// Handle POST /session/select/:id - Start a session
pub async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult {
    run(&state, Command::SelectExercise { id })
}

/// Handle POST /session/reps - Step or overwrite the live reps
pub async fn reps_handler(
    State(state): State<Arc<AppState>>,
    Json(edit): Json<RepsEdit>,
) -> ApiResult {
    let command = match edit {
        RepsEdit::Delta { delta } => Command::AdjustReps { delta },
        RepsEdit::Value { value } => Command::SetReps { input: value },
    };
    run(&state, command)
}

/// Handle POST /session/weight - Step or overwrite the live weight
pub async fn weight_handler(
    State(state): State<Arc<AppState>>,
    Json(edit): Json<WeightEdit>,
) -> ApiResult {
    let command = match edit {
        WeightEdit::Delta { delta } => Command::AdjustWeight { delta },
        WeightEdit::Value { value } => Command::SetWeight { input: value },
    };
    run(&state, command)
}

/// Handle POST /session/complete - Complete the current set
pub async fn complete_set_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::CompleteSet)
}

/// Handle POST /session/rest/adjust - Shift the live rest countdown
pub async fn adjust_rest_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RestAdjustRequest>,
) -> ApiResult {
    run(&state, Command::AdjustRestTimer { seconds: request.seconds })
}

/// Handle POST /session/rest/finish - Resume before the countdown ends
pub async fn finish_rest_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::FinishRest)
}

/// Handle POST /session/back - Return to the exercise list
pub async fn back_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::RequestReturnToSelection)
}

/// Handle POST /session/stopwatch - Start or stop the stopwatch
pub async fn stopwatch_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::ToggleStopwatch)
}

/// Handle POST /session/rename - Ask to rename the current exercise
pub async fn rename_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RenameRequest>,
) -> ApiResult {
    run(&state, Command::RequestRename { name: request.name })
}

/// Handle POST /settings/open
pub async fn open_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::OpenSettings)
}

/// Handle POST /settings/save
pub async fn save_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SettingsForm>,
) -> ApiResult {
    run(&state, Command::SaveSettings(form))
}

/// Handle POST /settings/cancel
pub async fn cancel_settings_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::CancelSettings)
}

/// Handle POST /decision/confirm - Answer yes to the pending prompt
pub async fn confirm_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::Confirm)
}

/// Handle POST /decision/cancel - Answer no to the pending prompt
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::Cancel)
}

/// Handle POST /notice/dismiss
pub async fn dismiss_notice_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::DismissNotice)
}

/// Handle POST /errors/clear - Drop the collected persistence errors
pub async fn clear_errors_handler(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::ClearErrors)
}

/// Handle GET /status - Return a compact status summary
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let snapshot = state.snapshot().map_err(|e| {
        error!("Failed to read snapshot: {}", e);
        ApiError::from(e)
    })?;
    let session = snapshot.session;
    let (last_action, last_action_time) = state.get_last_action();

    let rest_timer_active = state.timer_active(TimerKind::Rest)?;

    Ok(Json(StatusResponse {
        mode: session.to_string(),
        exercise: session.current_exercise.map(|e| e.name),
        rest_timer_active,
        rest_remaining_seconds: session.rest_remaining_seconds,
        stopwatch_running: session.stopwatch_running,
        stopwatch_seconds: session.stopwatch_seconds,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
