//! Session state machine
//!
//! Modes: `Selection`, `Active.Effort`, `Active.Rest`, `Settings`. Every
//! public operation checks the mode it is legal in and returns
//! [`SessionError::IllegalTransition`] otherwise, without touching state.

use tracing::{debug, info, warn};

use super::command::{Command, Outcome, PendingDecision, SettingsForm};
use crate::{
    catalog::{ExerciseCatalog, ExerciseDefaults, NewExercise},
    error::{Result, SessionError, StoreError},
    numeric::{parse_clamped, parse_clamped_count},
    state::{ActiveSubMode, Mode, Notice, SessionState, Snapshot, TimerKind, TimerState, TimerToken},
    tasks::Ticker,
};

/// Increment used by the renderer's rep stepper
pub const REPS_STEP: i64 = 1;
/// Increment used by the renderer's weight stepper
pub const WEIGHT_STEP: f64 = 2.5;

pub struct SessionController {
    state: SessionState,
    catalog: ExerciseCatalog,
    timers: TimerState,
    ticker: Box<dyn Ticker>,
    pending: Option<PendingDecision>,
}

impl SessionController {
    /// Create a controller on the selection screen. The unit preference is
    /// read from the catalog's store.
    pub fn new(
        catalog: ExerciseCatalog,
        ticker: Box<dyn Ticker>,
        rest_duration_seconds: u32,
    ) -> std::result::Result<Self, StoreError> {
        let unit = catalog.store().load_unit()?.unwrap_or_default();
        info!("Session controller ready: unit={}, rest={}s", unit, rest_duration_seconds);

        Ok(Self {
            state: SessionState::new(rest_duration_seconds, unit),
            catalog,
            timers: TimerState::new(),
            ticker,
            pending: None,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    pub fn pending(&self) -> Option<&PendingDecision> {
        self.pending.as_ref()
    }

    pub fn timers(&self) -> &TimerState {
        &self.timers
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.state, self.pending.as_ref(), self.catalog.all())
    }

    /// Single mutation entry point
    pub fn apply(&mut self, command: Command) -> Result<Outcome> {
        if !command.is_tick() {
            debug!("Applying {} in {}", command.name(), self.state);
        }

        let result = match command {
            Command::SelectExercise { id } => self.select_exercise(&id),
            Command::AdjustReps { delta } => self.adjust_reps(delta),
            Command::AdjustWeight { delta } => self.adjust_weight(delta),
            Command::SetReps { input } => self.set_reps(&input),
            Command::SetWeight { input } => self.set_weight(&input),
            Command::CompleteSet => self.complete_set(),
            Command::AdjustRestTimer { seconds } => self.adjust_rest_timer(seconds),
            Command::FinishRest => self.finish_rest(),
            Command::RequestReturnToSelection => self.request_return_to_selection(),
            Command::ToggleStopwatch => self.toggle_stopwatch(),
            Command::OpenSettings => self.open_settings(),
            Command::SaveSettings(form) => self.save_settings(form),
            Command::CancelSettings => self.cancel_settings(),
            Command::RequestRename { name } => self.request_rename(&name),
            Command::AddExercise(new) => self.add_exercise(new),
            Command::RequestRemove { id } => self.request_remove(&id),
            Command::Confirm => self.confirm(),
            Command::Cancel => self.cancel(),
            Command::DismissNotice => self.dismiss_notice(),
            Command::ClearErrors => self.clear_errors(),
            Command::Tick { kind, token } => Ok(self.tick(kind, token)),
        };

        for error in self.catalog.take_write_errors() {
            self.state.add_error(error);
        }
        result
    }

    /// Start a session on `id`. Legal from any mode; reselecting restarts.
    pub fn select_exercise(&mut self, id: &str) -> Result<Outcome> {
        let exercise = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownExercise(id.to_string()))?;

        self.stop_timer(TimerKind::Rest);
        self.stop_timer(TimerKind::Stopwatch);
        self.pending = None;

        info!(
            "Starting session: {} ({} x {} @ {}{})",
            exercise.name, exercise.default_sets, exercise.default_reps,
            exercise.default_weight, self.state.unit
        );
        self.state.begin(exercise);
        Ok(Outcome::Applied)
    }

    pub fn adjust_reps(&mut self, delta: i64) -> Result<Outcome> {
        self.require(self.state.is_effort(), "adjust_reps")?;

        let reps = i64::from(self.state.current_reps)
            .checked_add(delta)
            .and_then(|reps| u32::try_from(reps).ok());
        match reps {
            Some(reps) => {
                self.state.current_reps = reps;
                Ok(Outcome::Applied)
            }
            None => {
                debug!("Ignoring rep adjustment {} below zero", delta);
                Ok(Outcome::Ignored)
            }
        }
    }

    pub fn adjust_weight(&mut self, delta: f64) -> Result<Outcome> {
        self.require(self.state.is_effort(), "adjust_weight")?;

        let weight = self.state.current_weight + delta;
        if !weight.is_finite() || weight < 0.0 {
            debug!("Ignoring weight adjustment {} below zero", delta);
            return Ok(Outcome::Ignored);
        }
        self.state.current_weight = weight;
        Ok(Outcome::Applied)
    }

    /// Inline rep edit; malformed input keeps the previous value
    pub fn set_reps(&mut self, input: &str) -> Result<Outcome> {
        self.require(self.state.is_effort(), "set_reps")?;
        self.state.current_reps = parse_clamped_count(input, 0, self.state.current_reps);
        Ok(Outcome::Applied)
    }

    /// Inline weight edit; malformed input keeps the previous value
    pub fn set_weight(&mut self, input: &str) -> Result<Outcome> {
        self.require(self.state.is_effort(), "set_weight")?;
        self.state.current_weight = parse_clamped(input, 0.0, self.state.current_weight);
        Ok(Outcome::Applied)
    }

    /// Finish the current set: rest before the next one, or end the session
    /// after the last one.
    pub fn complete_set(&mut self) -> Result<Outcome> {
        self.require(self.state.is_effort(), "complete_set")?;

        if self.state.current_set < self.state.target_sets {
            self.pause_stopwatch();
            self.state.active_sub_mode = ActiveSubMode::Rest;
            self.state.rest_remaining_seconds = self.state.rest_duration_seconds;
            self.start_timer(TimerKind::Rest);
            info!(
                "Set {}/{} complete, resting {}s",
                self.state.current_set, self.state.target_sets, self.state.rest_duration_seconds
            );
            return Ok(Outcome::Applied);
        }

        self.finish_session();
        Ok(Outcome::Applied)
    }

    /// Handle a one-second tick. Ticks from a cancelled stream are no-ops.
    pub fn tick(&mut self, kind: TimerKind, token: TimerToken) -> Outcome {
        if !self.timers.is_live(kind, token) {
            debug!("Dropping stale {:?} tick {:?}", kind, token);
            return Outcome::Ignored;
        }

        match kind {
            TimerKind::Rest => {
                self.state.rest_remaining_seconds = self.state.rest_remaining_seconds.saturating_sub(1);
                if self.state.rest_remaining_seconds == 0 {
                    info!("Rest timer expired");
                    self.end_rest();
                }
            }
            TimerKind::Stopwatch => {
                self.state.stopwatch_seconds += 1;
            }
        }
        Outcome::Applied
    }

    /// Shift the live countdown; the configured rest duration is untouched
    pub fn adjust_rest_timer(&mut self, seconds: i64) -> Result<Outcome> {
        self.require(self.state.is_resting(), "adjust_rest_timer")?;

        let remaining = i64::from(self.state.rest_remaining_seconds).saturating_add(seconds).max(0);
        self.state.rest_remaining_seconds = u32::try_from(remaining).unwrap_or(u32::MAX);
        debug!("Rest timer adjusted by {}s to {}s", seconds, self.state.rest_remaining_seconds);
        Ok(Outcome::Applied)
    }

    /// Resume button: end the rest early and start the next set
    pub fn finish_rest(&mut self) -> Result<Outcome> {
        self.require(self.state.is_resting(), "finish_rest")?;
        self.end_rest();
        Ok(Outcome::Applied)
    }

    /// Leave the session. With completed sets this needs confirmation.
    pub fn request_return_to_selection(&mut self) -> Result<Outcome> {
        self.require(self.state.mode == Mode::Active, "request_return_to_selection")?;

        if self.state.current_set > 1 {
            let decision = PendingDecision::EndSession;
            self.pending = Some(decision.clone());
            return Ok(Outcome::AwaitingConfirmation(decision));
        }

        self.abandon_session();
        Ok(Outcome::Applied)
    }

    pub fn toggle_stopwatch(&mut self) -> Result<Outcome> {
        self.require(
            self.state.is_effort() && self.state.stopwatch_allowed(),
            "toggle_stopwatch",
        )?;

        if self.state.stopwatch_running {
            self.pause_stopwatch();
            debug!("Stopwatch paused at {}s", self.state.stopwatch_seconds);
        } else {
            self.state.stopwatch_running = true;
            self.start_timer(TimerKind::Stopwatch);
            debug!("Stopwatch running from {}s", self.state.stopwatch_seconds);
        }
        Ok(Outcome::Applied)
    }

    /// Open the settings panel over the running session. Timers keep going.
    pub fn open_settings(&mut self) -> Result<Outcome> {
        self.require(self.state.mode == Mode::Active, "open_settings")?;
        self.state.return_mode = Some(self.state.mode);
        self.state.mode = Mode::Settings;
        Ok(Outcome::Applied)
    }

    /// Navigate away from settings without applying the form
    pub fn cancel_settings(&mut self) -> Result<Outcome> {
        self.require(self.state.mode == Mode::Settings, "cancel_settings")?;
        self.state.mode = self.state.return_mode.take().unwrap_or(Mode::Active);
        Ok(Outcome::Applied)
    }

    /// Apply the settings form and write it back as the exercise's defaults
    pub fn save_settings(&mut self, form: SettingsForm) -> Result<Outcome> {
        self.require(self.state.mode == Mode::Settings, "save_settings")?;
        form.validate()?;

        if form.unit != self.state.unit {
            let previous = self.state.unit;
            self.catalog.rescale_weights(previous, form.unit);
            if let Err(e) = self.catalog.store().save_unit(form.unit) {
                self.state.add_error(format!("Saving unit preference failed: {}", e));
            }
            self.state.unit = form.unit;
            info!("Unit preference changed from {} to {}", previous, form.unit);
        }

        // The form weight is taken at face value in the (possibly new) unit.
        self.state.target_sets = form.sets;
        self.state.target_reps = form.reps;
        self.state.target_weight = form.weight;
        self.state.current_weight = form.weight;
        self.state.rest_duration_seconds = form.rest_seconds;

        if let Some(id) = self.state.current_exercise.as_ref().map(|e| e.id.clone()) {
            let defaults = ExerciseDefaults {
                sets: form.sets,
                reps: form.reps,
                weight: form.weight,
                stopwatch_enabled: form.stopwatch_enabled,
            };
            match self.catalog.update_defaults(&id, defaults) {
                Ok(updated) => self.state.current_exercise = Some(updated),
                Err(e) => warn!("Could not write defaults back to {}: {}", id, e),
            }
        }

        if !form.stopwatch_enabled {
            self.reset_stopwatch();
        }

        self.state.mode = Mode::Active;
        self.state.return_mode = None;

        info!(
            "Settings saved: {} x {} @ {}{}, rest {}s",
            form.sets, form.reps, form.weight, self.state.unit, form.rest_seconds
        );

        // Resolve a pending rest before clamping the set counter
        if self.state.active_sub_mode == ActiveSubMode::Rest {
            if self.state.current_set >= self.state.target_sets {
                self.finish_session();
                return Ok(Outcome::Applied);
            }
            self.end_rest();
        }
        self.state.current_set = self.state.current_set.min(self.state.target_sets);
        Ok(Outcome::Applied)
    }

    /// Ask to rename the current exercise. Empty or unchanged names revert.
    pub fn request_rename(&mut self, name: &str) -> Result<Outcome> {
        let current = match (&self.state.mode, &self.state.current_exercise) {
            (Mode::Active | Mode::Settings, Some(exercise)) => exercise,
            _ => return Err(self.illegal("request_rename")),
        };

        let name = name.trim();
        if name.is_empty() || name == current.name {
            debug!("Rename to {:?} reverted", name);
            return Ok(Outcome::Ignored);
        }

        let decision = PendingDecision::Rename { name: name.to_string() };
        self.pending = Some(decision.clone());
        Ok(Outcome::AwaitingConfirmation(decision))
    }

    pub fn add_exercise(&mut self, new: NewExercise) -> Result<Outcome> {
        self.require(self.state.mode == Mode::Selection, "add_exercise")?;
        self.catalog.add(new)?;
        Ok(Outcome::Applied)
    }

    /// Ask to delete an exercise from the catalog
    pub fn request_remove(&mut self, id: &str) -> Result<Outcome> {
        self.require(self.state.mode == Mode::Selection, "request_remove")?;

        let exercise = self
            .catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownExercise(id.to_string()))?;
        let decision = PendingDecision::RemoveExercise {
            id: exercise.id.clone(),
            name: exercise.name.clone(),
        };
        self.pending = Some(decision.clone());
        Ok(Outcome::AwaitingConfirmation(decision))
    }

    /// Answer "yes" to the pending decision
    pub fn confirm(&mut self) -> Result<Outcome> {
        let decision = self.pending.take().ok_or(SessionError::NoPendingDecision)?;
        info!("Confirmed {:?}", decision);

        match decision {
            PendingDecision::EndSession => {
                if self.state.mode == Mode::Selection {
                    return Ok(Outcome::Ignored);
                }
                self.abandon_session();
            }
            PendingDecision::Rename { name } => {
                let Some(id) = self.state.current_exercise.as_ref().map(|e| e.id.clone()) else {
                    return Ok(Outcome::Ignored);
                };
                let renamed = self.catalog.rename(&id, &name)?;
                self.state.current_exercise = Some(renamed);
            }
            PendingDecision::RemoveExercise { id, .. } => {
                self.catalog.remove(&id)?;
            }
        }
        Ok(Outcome::Applied)
    }

    /// Answer "no" to the pending decision; nothing else changes
    pub fn cancel(&mut self) -> Result<Outcome> {
        let decision = self.pending.take().ok_or(SessionError::NoPendingDecision)?;
        debug!("Cancelled {:?}", decision);
        Ok(Outcome::Applied)
    }

    pub fn dismiss_notice(&mut self) -> Result<Outcome> {
        Ok(match self.state.notice.take() {
            Some(_) => Outcome::Applied,
            None => Outcome::Ignored,
        })
    }

    /// Drop the collected persistence errors
    pub fn clear_errors(&mut self) -> Result<Outcome> {
        if self.state.errors.is_empty() {
            return Ok(Outcome::Ignored);
        }
        debug!("Clearing {} errors", self.state.errors.len());
        self.state.errors.clear();
        Ok(Outcome::Applied)
    }

    fn end_rest(&mut self) {
        self.stop_timer(TimerKind::Rest);
        self.state.current_set += 1;
        self.state.current_reps = 0;
        self.reset_stopwatch();
        self.state.active_sub_mode = ActiveSubMode::Effort;
        info!("Starting set {}/{}", self.state.current_set, self.state.target_sets);
    }

    fn finish_session(&mut self) {
        let exercise = self
            .state
            .current_exercise
            .as_ref()
            .map(|e| e.name.clone())
            .unwrap_or_default();
        info!("All {} sets of {} complete", self.state.target_sets, exercise);

        self.stop_timer(TimerKind::Rest);
        self.stop_timer(TimerKind::Stopwatch);
        self.pending = None;
        self.state.notice = Some(Notice::SessionComplete {
            exercise,
            sets: self.state.target_sets,
        });
        self.state.reset_to_selection();
    }

    fn abandon_session(&mut self) {
        self.stop_timer(TimerKind::Rest);
        self.stop_timer(TimerKind::Stopwatch);
        self.pending = None;
        info!("Session abandoned at set {}", self.state.current_set);
        self.state.reset_to_selection();
    }

    fn pause_stopwatch(&mut self) {
        self.stop_timer(TimerKind::Stopwatch);
        self.state.stopwatch_running = false;
    }

    fn reset_stopwatch(&mut self) {
        self.pause_stopwatch();
        self.state.stopwatch_seconds = 0;
    }

    fn start_timer(&mut self, kind: TimerKind) {
        let token = self.timers.arm(kind);
        self.ticker.start(kind, token);
    }

    fn stop_timer(&mut self, kind: TimerKind) {
        if self.timers.disarm(kind).is_some() {
            self.ticker.stop(kind);
        }
    }

    fn require(&self, allowed: bool, operation: &'static str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(self.illegal(operation))
        }
    }

    fn illegal(&self, operation: &'static str) -> SessionError {
        warn!("Rejected {} in {}", operation, self.state);
        SessionError::IllegalTransition {
            operation,
            state: self.state.to_string(),
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("catalog", &self.catalog)
            .field("timers", &self.timers)
            .field("pending", &self.pending)
            .finish()
    }
}
