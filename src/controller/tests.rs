use std::sync::Arc;

use super::*;
use crate::{
    catalog::{seed_exercises, ExerciseCatalog, ExerciseDefinition, NewExercise},
    error::{SessionError, ValidationError},
    state::{ActiveSubMode, Mode, Notice, TimerKind},
    storage::MemoryStore,
    tasks::{ManualTicker, TickerCall},
    units::Unit,
};

struct Harness {
    controller: SessionController,
    ticker: ManualTicker,
    store: MemoryStore,
}

impl Harness {
    fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    fn with_store(store: MemoryStore) -> Self {
        let catalog = ExerciseCatalog::load(Arc::new(store.clone())).unwrap();
        let ticker = ManualTicker::new();
        let controller = SessionController::new(catalog, Box::new(ticker.clone()), 90).unwrap();
        Self { controller, ticker, store }
    }

    fn with_exercise(exercise: ExerciseDefinition) -> Self {
        Self::with_store(MemoryStore::with_exercises(vec![exercise]))
    }

    fn select(&mut self, id: &str) {
        self.controller.select_exercise(id).unwrap();
    }

    /// Deliver one tick from the live stream of `kind`
    fn tick(&mut self, kind: TimerKind) -> Outcome {
        let token = self.controller.timers().token(kind).expect("timer not armed");
        self.controller.tick(kind, token)
    }

    fn state(&self) -> &crate::state::SessionState {
        self.controller.state()
    }
}

fn exercise(sets: u32, reps: u32, weight: f64, stopwatch: bool) -> ExerciseDefinition {
    ExerciseDefinition {
        id: "press".to_string(),
        name: "Press".to_string(),
        default_sets: sets,
        default_reps: reps,
        default_weight: weight,
        stopwatch_enabled: stopwatch,
    }
}

fn is_illegal(result: crate::error::Result<Outcome>) -> bool {
    matches!(result, Err(SessionError::IllegalTransition { .. }))
}

#[test]
fn test_select_seeds_session_from_defaults() {
    let mut h = Harness::new();
    h.select("squat");

    let state = h.state();
    assert_eq!(state.mode, Mode::Active);
    assert_eq!(state.active_sub_mode, ActiveSubMode::Effort);
    assert_eq!(state.current_set, 1);
    assert_eq!(state.target_sets, 5);
    assert_eq!(state.target_reps, 5);
    assert_eq!(state.target_weight, 80.0);
    assert_eq!(state.current_reps, 0);
    assert_eq!(state.current_weight, 80.0);
    assert!(h.ticker.calls().is_empty());
}

#[test]
fn test_select_unknown_exercise_changes_nothing() {
    let mut h = Harness::new();
    let err = h.controller.select_exercise("nope").unwrap_err();
    assert_eq!(err, SessionError::UnknownExercise("nope".into()));
    assert_eq!(h.state().mode, Mode::Selection);
}

#[test]
fn test_reselect_restarts_session_and_cancels_timers() {
    let mut h = Harness::with_exercise(exercise(3, 5, 50.0, true));
    h.select("press");
    h.controller.toggle_stopwatch().unwrap();
    h.tick(TimerKind::Stopwatch);
    h.controller.complete_set().unwrap();

    h.select("press");

    assert_eq!(h.state().current_set, 1);
    assert_eq!(h.state().active_sub_mode, ActiveSubMode::Effort);
    assert_eq!(h.state().stopwatch_seconds, 0);
    assert!(!h.controller.timers().is_active(TimerKind::Rest));
    assert!(!h.controller.timers().is_active(TimerKind::Stopwatch));
}

#[test]
fn test_adjustments_never_go_negative() {
    let mut h = Harness::new();
    h.select("pullup");

    let deltas = [1, -2, 3, -1, -5, 2, -10];
    for delta in deltas {
        h.controller.adjust_reps(delta * REPS_STEP).unwrap();
        h.controller.adjust_weight(delta as f64 * WEIGHT_STEP).unwrap();
        assert!(h.state().current_weight >= 0.0);
    }
    assert_eq!(h.state().current_reps, 5);
    assert_eq!(h.state().current_weight, 12.5);
}

#[test]
fn test_negative_adjustment_is_ignored_not_clamped() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.adjust_reps(3 * REPS_STEP).unwrap();

    assert_eq!(h.controller.adjust_reps(-4 * REPS_STEP).unwrap(), Outcome::Ignored);
    assert_eq!(h.state().current_reps, 3);
    assert_eq!(h.controller.adjust_weight(-61.0).unwrap(), Outcome::Ignored);
    assert_eq!(h.state().current_weight, 60.0);
    assert_eq!(h.controller.adjust_weight(-WEIGHT_STEP).unwrap(), Outcome::Applied);
    assert_eq!(h.state().current_weight, 57.5);
}

#[test]
fn test_inline_edits_clamp_and_fall_back() {
    let mut h = Harness::new();
    h.select("bench");

    h.controller.set_reps("12").unwrap();
    assert_eq!(h.state().current_reps, 12);
    h.controller.set_reps("twelve").unwrap();
    assert_eq!(h.state().current_reps, 12);
    h.controller.set_reps("-4").unwrap();
    assert_eq!(h.state().current_reps, 0);

    h.controller.set_weight("62.5").unwrap();
    assert_eq!(h.state().current_weight, 62.5);
    h.controller.set_weight("").unwrap();
    assert_eq!(h.state().current_weight, 62.5);
}

#[test]
fn test_adjustments_illegal_outside_effort() {
    let mut h = Harness::new();
    assert!(is_illegal(h.controller.adjust_reps(1)));

    h.select("bench");
    h.controller.complete_set().unwrap();
    assert!(is_illegal(h.controller.adjust_weight(2.5)));
    assert!(is_illegal(h.controller.set_reps("3")));
    assert!(is_illegal(h.controller.complete_set()));
}

#[test]
fn test_complete_set_enters_rest_with_full_duration() {
    let mut h = Harness::new();
    h.select("bench");

    h.controller.complete_set().unwrap();

    assert_eq!(h.state().active_sub_mode, ActiveSubMode::Rest);
    assert_eq!(h.state().rest_remaining_seconds, h.state().rest_duration_seconds);
    assert_eq!(h.state().current_set, 1);
    assert_eq!(h.state().up_next_set(), Some(2));
    assert_eq!(h.ticker.starts(TimerKind::Rest), 1);
}

#[test]
fn test_three_set_scenario_exits_to_selection() {
    let mut h = Harness::with_exercise(exercise(3, 5, 100.0, false));
    h.select("press");
    assert_eq!(h.state().current_set, 1);
    assert_eq!(h.state().target_sets, 3);

    for _ in 0..2 {
        h.controller.complete_set().unwrap();
        h.controller.finish_rest().unwrap();
    }
    assert_eq!(h.state().current_set, 3);
    assert!(h.state().is_effort());

    h.controller.complete_set().unwrap();

    assert_eq!(h.state().mode, Mode::Selection);
    assert!(h.state().current_exercise.is_none());
    assert_eq!(
        h.state().notice,
        Some(Notice::SessionComplete { exercise: "Press".into(), sets: 3 })
    );
    assert!(!h.controller.timers().is_active(TimerKind::Rest));

    assert_eq!(h.controller.dismiss_notice().unwrap(), Outcome::Applied);
    assert!(h.state().notice.is_none());
    assert_eq!(h.controller.dismiss_notice().unwrap(), Outcome::Ignored);
}

#[test]
fn test_countdown_expiry_matches_manual_finish() {
    let mut by_timer = Harness::with_exercise(exercise(4, 8, 40.0, true));
    let mut by_button = Harness::with_exercise(exercise(4, 8, 40.0, true));

    for h in [&mut by_timer, &mut by_button] {
        h.select("press");
        h.controller.adjust_reps(8).unwrap();
        h.controller.toggle_stopwatch().unwrap();
        h.tick(TimerKind::Stopwatch);
        h.controller.complete_set().unwrap();
        h.tick(TimerKind::Rest);
    }

    while by_timer.state().active_sub_mode == ActiveSubMode::Rest {
        by_timer.tick(TimerKind::Rest);
    }
    by_button.controller.finish_rest().unwrap();

    for h in [&by_timer, &by_button] {
        let state = h.state();
        assert_eq!(state.current_set, 2);
        assert_eq!(state.current_reps, 0);
        assert_eq!(state.stopwatch_seconds, 0);
        assert!(!state.stopwatch_running);
        assert!(state.is_effort());
        assert_eq!(state.current_weight, 40.0);
        assert!(!h.controller.timers().is_active(TimerKind::Rest));
    }
}

#[test]
fn test_rest_adjustment_never_below_zero() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    while h.state().rest_remaining_seconds > 15 {
        h.tick(TimerKind::Rest);
    }

    h.controller.adjust_rest_timer(-20).unwrap();
    assert_eq!(h.state().rest_remaining_seconds, 0);
    assert!(h.state().is_resting());

    h.controller.adjust_rest_timer(-1_000_000).unwrap();
    assert_eq!(h.state().rest_remaining_seconds, 0);
    assert_eq!(h.state().rest_duration_seconds, 90);

    // the next tick finishes the rest
    h.tick(TimerKind::Rest);
    assert!(h.state().is_effort());
    assert_eq!(h.state().current_set, 2);
}

#[test]
fn test_rest_adjustment_can_extend_past_duration() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();

    h.controller.adjust_rest_timer(10).unwrap();
    assert_eq!(h.state().rest_remaining_seconds, 100);
    assert_eq!(h.state().rest_duration_seconds, 90);
}

#[test]
fn test_stale_ticks_are_ignored() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    let old = h.controller.timers().token(TimerKind::Rest).unwrap();
    h.controller.finish_rest().unwrap();

    assert_eq!(h.controller.tick(TimerKind::Rest, old), Outcome::Ignored);
    assert_eq!(h.state().current_set, 2);

    h.controller.complete_set().unwrap();
    assert_eq!(h.controller.tick(TimerKind::Rest, old), Outcome::Ignored);
    assert_eq!(h.state().rest_remaining_seconds, 90);
}

#[test]
fn test_reentering_rest_restarts_single_countdown() {
    let mut h = Harness::new();
    h.select("squat");
    h.controller.complete_set().unwrap();
    h.controller.finish_rest().unwrap();
    h.controller.complete_set().unwrap();

    let starts = h.ticker.starts(TimerKind::Rest);
    let stops = h
        .ticker
        .calls()
        .iter()
        .filter(|c| **c == TickerCall::Stop(TimerKind::Rest))
        .count();
    assert_eq!(starts, 2);
    assert_eq!(stops, 1);
}

#[test]
fn test_double_toggle_leaves_stopwatch_stopped_and_unchanged() {
    let mut h = Harness::with_exercise(exercise(3, 5, 20.0, true));
    h.select("press");
    h.controller.toggle_stopwatch().unwrap();
    h.tick(TimerKind::Stopwatch);
    h.tick(TimerKind::Stopwatch);
    h.controller.toggle_stopwatch().unwrap();
    let before = h.state().stopwatch_seconds;

    h.controller.toggle_stopwatch().unwrap();
    h.controller.toggle_stopwatch().unwrap();

    assert!(!h.state().stopwatch_running);
    assert_eq!(h.state().stopwatch_seconds, before);
    assert_eq!(before, 2);
}

#[test]
fn test_stopwatch_requires_feature_and_effort() {
    let mut h = Harness::new();
    h.select("bench");
    assert!(is_illegal(h.controller.toggle_stopwatch()));

    let mut h = Harness::with_exercise(exercise(3, 5, 20.0, true));
    h.select("press");
    h.controller.complete_set().unwrap();
    assert!(is_illegal(h.controller.toggle_stopwatch()));
}

#[test]
fn test_stopwatch_paused_before_rest() {
    let mut h = Harness::with_exercise(exercise(3, 5, 20.0, true));
    h.select("press");
    h.controller.toggle_stopwatch().unwrap();
    let token = h.controller.timers().token(TimerKind::Stopwatch).unwrap();

    h.controller.complete_set().unwrap();

    assert!(!h.state().stopwatch_running);
    assert!(!h.controller.timers().is_active(TimerKind::Stopwatch));
    assert_eq!(h.controller.tick(TimerKind::Stopwatch, token), Outcome::Ignored);
    assert!(h.controller.timers().is_active(TimerKind::Rest));
}

#[test]
fn test_return_at_first_set_is_immediate() {
    let mut h = Harness::new();
    h.select("bench");

    let outcome = h.controller.request_return_to_selection().unwrap();

    assert_eq!(outcome, Outcome::Applied);
    assert!(h.controller.pending().is_none());
    assert_eq!(h.state().mode, Mode::Selection);
}

#[test]
fn test_return_after_first_set_needs_confirmation() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    h.controller.finish_rest().unwrap();

    let outcome = h.controller.request_return_to_selection().unwrap();
    assert_eq!(outcome, Outcome::AwaitingConfirmation(PendingDecision::EndSession));
    assert_eq!(h.state().mode, Mode::Active);
    assert_eq!(h.state().current_set, 2);

    h.controller.cancel().unwrap();
    assert_eq!(h.state().mode, Mode::Active);
    assert_eq!(h.state().current_set, 2);

    h.controller.request_return_to_selection().unwrap();
    h.controller.confirm().unwrap();
    assert_eq!(h.state().mode, Mode::Selection);
    assert!(h.state().notice.is_none());
}

#[test]
fn test_return_during_rest_cancels_countdown() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    let token = h.controller.timers().token(TimerKind::Rest).unwrap();

    h.controller.request_return_to_selection().unwrap();

    assert_eq!(h.state().mode, Mode::Selection);
    assert_eq!(h.controller.tick(TimerKind::Rest, token), Outcome::Ignored);
}

#[test]
fn test_confirm_without_pending_decision() {
    let mut h = Harness::new();
    assert_eq!(h.controller.confirm().unwrap_err(), SessionError::NoPendingDecision);
    assert_eq!(h.controller.cancel().unwrap_err(), SessionError::NoPendingDecision);
}

#[test]
fn test_settings_round_trip_returns_to_effort() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.open_settings().unwrap();
    assert_eq!(h.state().mode, Mode::Settings);
    assert_eq!(h.state().return_mode, Some(Mode::Active));

    h.controller.cancel_settings().unwrap();
    assert!(h.state().is_effort());
    assert!(is_illegal(h.controller.cancel_settings()));
}

#[test]
fn test_settings_illegal_from_selection() {
    let mut h = Harness::new();
    assert!(is_illegal(h.controller.open_settings()));
    let form = SettingsForm::from_state(h.state());
    assert!(is_illegal(h.controller.save_settings(form)));
}

#[test]
fn test_save_settings_updates_targets_and_defaults() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.open_settings().unwrap();

    let form = SettingsForm {
        sets: 5,
        reps: 6,
        weight: 70.0,
        rest_seconds: 120,
        unit: Unit::Kg,
        stopwatch_enabled: true,
    };
    h.controller.save_settings(form).unwrap();

    let state = h.state();
    assert!(state.is_effort());
    assert_eq!(state.target_sets, 5);
    assert_eq!(state.target_reps, 6);
    assert_eq!(state.target_weight, 70.0);
    assert_eq!(state.current_weight, 70.0);
    assert_eq!(state.rest_duration_seconds, 120);

    let current = state.current_exercise.as_ref().unwrap();
    assert_eq!(current.default_sets, 5);
    assert!(current.stopwatch_enabled);

    let stored = h.store.exercises().unwrap();
    let bench = stored.iter().find(|e| e.id == "bench").unwrap();
    assert_eq!(bench.default_reps, 6);
    assert_eq!(bench.default_weight, 70.0);
}

#[test]
fn test_save_settings_rejects_invalid_form_without_mutation() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.open_settings().unwrap();
    let valid = SettingsForm::from_state(h.state());

    let invalid = [
        (SettingsForm { sets: 0, ..valid.clone() }, ValidationError::NonPositiveSets),
        (SettingsForm { reps: 0, ..valid.clone() }, ValidationError::NonPositiveReps),
        (SettingsForm { weight: -2.5, ..valid.clone() }, ValidationError::InvalidWeight(-2.5)),
    ];
    for (form, expected) in invalid {
        let err = h.controller.save_settings(form).unwrap_err();
        assert_eq!(err, SessionError::Validation(expected));
    }

    assert_eq!(h.state().mode, Mode::Settings);
    assert_eq!(h.state().target_sets, 4);
    assert_eq!(h.store.write_count(), 0);
}

#[test]
fn test_unit_change_converts_catalog_not_live_values() {
    let mut h = Harness::new();
    h.select("squat");
    h.controller.open_settings().unwrap();

    let form = SettingsForm {
        unit: Unit::Lbs,
        weight: 185.0,
        ..SettingsForm::from_state(h.state())
    };
    h.controller.save_settings(form).unwrap();

    assert_eq!(h.state().unit, Unit::Lbs);
    assert_eq!(h.store.unit(), Some(Unit::Lbs));
    assert_eq!(h.state().current_weight, 185.0);

    let catalog = h.controller.catalog();
    assert_eq!(catalog.get("bench").unwrap().default_weight, 132.0);
    assert_eq!(catalog.get("dl").unwrap().default_weight, 220.0);
    assert_eq!(catalog.get("squat").unwrap().default_weight, 185.0);
}

#[test]
fn test_unit_round_trip_through_settings() {
    let mut h = Harness::new();
    let original: Vec<f64> = seed_exercises().iter().map(|e| e.default_weight).collect();
    h.select("pullup");

    for unit in [Unit::Lbs, Unit::Kg] {
        h.controller.open_settings().unwrap();
        let form = SettingsForm { unit, ..SettingsForm::from_state(h.state()) };
        h.controller.save_settings(form).unwrap();
    }

    for (exercise, before) in h.controller.catalog().all().iter().zip(original) {
        assert!((exercise.default_weight - before).abs() <= 1.0);
    }
}

#[test]
fn test_disabling_stopwatch_in_settings_stops_it() {
    let mut h = Harness::with_exercise(exercise(3, 5, 20.0, true));
    h.select("press");
    h.controller.toggle_stopwatch().unwrap();
    h.tick(TimerKind::Stopwatch);
    h.controller.open_settings().unwrap();

    let form = SettingsForm { stopwatch_enabled: false, ..SettingsForm::from_state(h.state()) };
    h.controller.save_settings(form).unwrap();

    assert!(!h.state().stopwatch_running);
    assert_eq!(h.state().stopwatch_seconds, 0);
    assert!(!h.controller.timers().is_active(TimerKind::Stopwatch));
    assert!(is_illegal(h.controller.toggle_stopwatch()));
}

#[test]
fn test_lowering_target_sets_clamps_current_set() {
    let mut h = Harness::with_exercise(exercise(5, 5, 20.0, false));
    h.select("press");
    for _ in 0..3 {
        h.controller.complete_set().unwrap();
        h.controller.finish_rest().unwrap();
    }
    assert_eq!(h.state().current_set, 4);

    h.controller.open_settings().unwrap();
    let form = SettingsForm { sets: 2, ..SettingsForm::from_state(h.state()) };
    h.controller.save_settings(form).unwrap();

    assert_eq!(h.state().current_set, 2);
    assert_eq!(h.state().target_sets, 2);
}

#[test]
fn test_settings_opened_during_rest() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    h.controller.open_settings().unwrap();

    // countdown keeps running behind the panel
    assert_eq!(h.tick(TimerKind::Rest), Outcome::Applied);
    assert_eq!(h.state().rest_remaining_seconds, 89);

    let form = SettingsForm::from_state(h.state());
    h.controller.save_settings(form).unwrap();

    assert!(h.state().is_effort());
    assert_eq!(h.state().current_set, 2);
    assert!(!h.controller.timers().is_active(TimerKind::Rest));
}

/// Bench is a 4-set exercise; rest after set 2
fn resting_after_second_bench_set() -> Harness {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    h.controller.finish_rest().unwrap();
    h.controller.complete_set().unwrap();
    assert!(h.state().is_resting());
    assert_eq!(h.state().current_set, 2);
    h.controller.open_settings().unwrap();
    h
}

#[test]
fn test_lowering_sets_during_rest_keeps_set_within_target() {
    let mut h = resting_after_second_bench_set();
    let form = SettingsForm { sets: 3, ..SettingsForm::from_state(h.state()) };

    h.controller.save_settings(form).unwrap();

    assert!(h.state().is_effort());
    assert_eq!(h.state().target_sets, 3);
    assert_eq!(h.state().current_set, 3);
    assert!(!h.controller.timers().is_active(TimerKind::Rest));
}

#[test]
fn test_lowering_sets_to_completed_count_during_rest_ends_session() {
    let mut h = resting_after_second_bench_set();
    let form = SettingsForm { sets: 2, ..SettingsForm::from_state(h.state()) };

    h.controller.save_settings(form).unwrap();

    assert_eq!(h.state().mode, Mode::Selection);
    assert_eq!(
        h.state().notice,
        Some(Notice::SessionComplete { exercise: "Bench Press".into(), sets: 2 })
    );
    assert!(!h.controller.timers().is_active(TimerKind::Rest));
    assert_eq!(h.controller.catalog().get("bench").unwrap().default_sets, 2);
}

#[test]
fn test_cancel_settings_during_rest_resumes_rest() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    h.controller.open_settings().unwrap();
    h.controller.cancel_settings().unwrap();

    assert!(h.state().is_resting());
    assert!(h.controller.timers().is_active(TimerKind::Rest));
}

#[test]
fn test_rename_flow() {
    let mut h = Harness::new();
    h.select("dl");

    assert_eq!(h.controller.request_rename("  ").unwrap(), Outcome::Ignored);
    assert_eq!(h.controller.request_rename("Deadlift").unwrap(), Outcome::Ignored);
    assert!(h.controller.pending().is_none());

    let outcome = h.controller.request_rename(" Romanian Deadlift ").unwrap();
    assert_eq!(
        outcome,
        Outcome::AwaitingConfirmation(PendingDecision::Rename { name: "Romanian Deadlift".into() })
    );
    h.controller.cancel().unwrap();
    assert_eq!(h.state().current_exercise.as_ref().unwrap().name, "Deadlift");
    assert_eq!(h.store.write_count(), 0);

    h.controller.request_rename("Romanian Deadlift").unwrap();
    h.controller.confirm().unwrap();
    assert_eq!(h.state().current_exercise.as_ref().unwrap().name, "Romanian Deadlift");
    assert_eq!(h.controller.catalog().get("dl").unwrap().name, "Romanian Deadlift");
    assert_eq!(h.store.write_count(), 1);
}

#[test]
fn test_rename_illegal_without_session() {
    let mut h = Harness::new();
    assert!(is_illegal(h.controller.request_rename("Anything")));
}

#[test]
fn test_add_and_remove_from_selection() {
    let mut h = Harness::new();
    h.controller
        .add_exercise(NewExercise {
            name: "Row".into(),
            sets: 3,
            reps: 10,
            weight: 40.0,
            stopwatch_enabled: false,
        })
        .unwrap();
    assert_eq!(h.controller.catalog().len(), 5);

    let outcome = h.controller.request_remove("squat").unwrap();
    assert_eq!(
        outcome,
        Outcome::AwaitingConfirmation(PendingDecision::RemoveExercise {
            id: "squat".into(),
            name: "Squat".into()
        })
    );
    assert_eq!(h.controller.catalog().len(), 5);

    h.controller.confirm().unwrap();
    assert!(h.controller.catalog().get("squat").is_none());
    assert_eq!(h.store.exercises().unwrap().len(), 4);
}

#[test]
fn test_catalog_edits_illegal_during_session() {
    let mut h = Harness::new();
    h.select("bench");
    assert!(is_illegal(h.controller.request_remove("squat")));
    let new = NewExercise {
        name: "Row".into(),
        sets: 3,
        reps: 10,
        weight: 40.0,
        stopwatch_enabled: false,
    };
    assert!(is_illegal(h.controller.add_exercise(new)));
}

#[test]
fn test_apply_surfaces_store_failures_in_state() {
    let mut h = Harness::new();
    h.store.set_fail_writes(true);
    h.controller.apply(Command::SelectExercise { id: "bench".into() }).unwrap();
    h.controller.apply(Command::OpenSettings).unwrap();
    let form = SettingsForm { reps: 12, ..SettingsForm::from_state(h.state()) };

    h.controller.apply(Command::SaveSettings(form)).unwrap();

    assert_eq!(h.state().target_reps, 12);
    assert_eq!(h.state().errors.len(), 1);
    assert!(h.controller.snapshot().session.errors[0].contains("Saving exercises failed"));
}

#[test]
fn test_store_errors_are_capped_and_clearable() {
    let mut h = Harness::new();
    h.store.set_fail_writes(true);
    for i in 0..50 {
        let new = NewExercise {
            name: format!("Drill {}", i),
            sets: 3,
            reps: 10,
            weight: 0.0,
            stopwatch_enabled: false,
        };
        h.controller.apply(Command::AddExercise(new)).unwrap();
    }
    h.store.set_fail_writes(false);
    assert_eq!(h.state().errors.len(), crate::state::MAX_ERRORS);

    h.controller.apply(Command::SelectExercise { id: "bench".into() }).unwrap();
    h.controller.apply(Command::RequestReturnToSelection).unwrap();
    assert_eq!(h.state().errors.len(), crate::state::MAX_ERRORS);

    assert_eq!(h.controller.apply(Command::ClearErrors).unwrap(), Outcome::Applied);
    assert!(h.state().errors.is_empty());
    assert_eq!(h.controller.apply(Command::ClearErrors).unwrap(), Outcome::Ignored);
}

#[test]
fn test_controller_loads_stored_unit() {
    let store = MemoryStore::new().with_unit(Unit::Lbs);
    let h = Harness::with_store(store);
    assert_eq!(h.state().unit, Unit::Lbs);
}

#[test]
fn test_snapshot_formats_rest_clock() {
    let mut h = Harness::new();
    h.select("bench");
    h.controller.complete_set().unwrap();
    h.tick(TimerKind::Rest);

    let snapshot = h.controller.snapshot();
    assert_eq!(snapshot.rest_clock, "1:29");
    assert_eq!(snapshot.up_next_set, Some(2));
    assert_eq!(snapshot.exercises.len(), 4);
}
