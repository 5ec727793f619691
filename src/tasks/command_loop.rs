//! Command loop background task

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{controller::Command, state::AppState};

/// Background task that applies queued commands (timer ticks) to the session
pub async fn command_loop(state: Arc<AppState>, mut rx: mpsc::UnboundedReceiver<Command>) {
    info!("Starting command loop");

    while let Some(command) = rx.recv().await {
        let action = command.name();
        if let Err(e) = state.dispatch(command) {
            warn!("Queued {} failed: {}", action, e);
        }
    }

    info!("Command channel closed, command loop exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::{
        catalog::ExerciseCatalog,
        controller::SessionController,
        state::{ActiveSubMode, Mode},
        storage::MemoryStore,
        tasks::TokioTicker,
    };

    fn spawn_app(rest_seconds: u32) -> Arc<AppState> {
        let (tx, rx) = mpsc::unbounded_channel();
        let catalog = ExerciseCatalog::load(Arc::new(MemoryStore::new())).unwrap();
        let controller =
            SessionController::new(catalog, Box::new(TokioTicker::new(tx)), rest_seconds).unwrap();
        let state = Arc::new(AppState::new(controller, 0, "127.0.0.1".to_string()));
        tokio::spawn(command_loop(Arc::clone(&state), rx));
        state
    }

    #[tokio::test(start_paused = true)]
    async fn test_rest_countdown_runs_to_next_set() {
        let state = spawn_app(3);
        state.dispatch(Command::SelectExercise { id: "bench".into() }).unwrap();
        state.dispatch(Command::CompleteSet).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let resting = state.snapshot().unwrap();
        assert_eq!(resting.session.active_sub_mode, ActiveSubMode::Rest);
        assert_eq!(resting.session.rest_remaining_seconds, 2);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let snapshot = state.snapshot().unwrap();
        assert_eq!(snapshot.session.mode, Mode::Active);
        assert_eq!(snapshot.session.active_sub_mode, ActiveSubMode::Effort);
        assert_eq!(snapshot.session.current_set, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopwatch_counts_while_running() {
        let state = spawn_app(90);
        state.dispatch(Command::SelectExercise { id: "pullup".into() }).unwrap();
        state.dispatch(Command::OpenSettings).unwrap();
        let mut form = crate::controller::SettingsForm::from_state(&state.snapshot().unwrap().session);
        form.stopwatch_enabled = true;
        state.dispatch(Command::SaveSettings(form)).unwrap();

        state.dispatch(Command::ToggleStopwatch).unwrap();
        tokio::time::sleep(Duration::from_millis(4500)).await;
        state.dispatch(Command::ToggleStopwatch).unwrap();
        tokio::time::sleep(Duration::from_secs(3)).await;

        let snapshot = state.snapshot().unwrap();
        assert!(!snapshot.session.stopwatch_running);
        assert_eq!(snapshot.session.stopwatch_seconds, 4);
    }
}
