//! HTTP API module
//!
//! This module is the rendering boundary: renderer callbacks come in as
//! requests and every response carries the new snapshot.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(state_handler))
        .route("/events", get(events_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        // Exercise list
        .route("/exercises", post(add_exercise_handler))
        .route("/exercises/:id", delete(remove_exercise_handler))
        // Active session
        .route("/session/select/:id", post(select_handler))
        .route("/session/reps", post(reps_handler))
        .route("/session/weight", post(weight_handler))
        .route("/session/complete", post(complete_set_handler))
        .route("/session/rest/adjust", post(adjust_rest_handler))
        .route("/session/rest/finish", post(finish_rest_handler))
        .route("/session/back", post(back_handler))
        .route("/session/stopwatch", post(stopwatch_handler))
        .route("/session/rename", post(rename_handler))
        // Settings panel
        .route("/settings/open", post(open_settings_handler))
        .route("/settings/save", post(save_settings_handler))
        .route("/settings/cancel", post(cancel_settings_handler))
        // Confirmation prompts and notices
        .route("/decision/confirm", post(confirm_handler))
        .route("/decision/cancel", post(cancel_handler))
        .route("/notice/dismiss", post(dismiss_notice_handler))
        .route("/errors/clear", post(clear_errors_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
