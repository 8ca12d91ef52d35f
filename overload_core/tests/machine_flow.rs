mod common;

use common::{catalog, clock, log, settings, start_squat};
use overload_core::{
    Command, CommandKind, Decision, EngineError, MemoryStore, Prescription, Rating, SessionMachine,
    SessionStore, StateTag,
};
use std::time::Duration;

#[test]
fn full_session_escalates_single_and_carries_over() {
    let store = MemoryStore::new();
    let clock = clock();
    let mut m = SessionMachine::new(catalog(), settings(), store.clone(), clock.clone());

    assert_eq!(m.apply(Command::Begin).unwrap().state, StateTag::WorkoutSelection);
    let v = m.apply(Command::SelectWorkout("lower".into())).unwrap();
    assert_eq!(v.state, StateTag::PreWorkout);
    assert_eq!(v.session_id.as_deref(), Some("20260302T070000"));
    assert_eq!(m.apply(Command::Advance).unwrap().state, StateTag::WorkoutOverview);

    // barbell first exercise: 47.5x8, 62.5x5, 75x3 before 95
    let v = m.apply(Command::Advance).unwrap();
    assert_eq!(v.state, StateTag::Warmup(0));
    let w = v.warmup.unwrap();
    assert_eq!((w.weight, w.reps), (47.5, 8));
    assert_eq!(v.plates.as_deref(), Some(&[10.0, 2.5, 1.25][..]));
    assert_eq!(m.apply(Command::Advance).unwrap().state, StateTag::Warmup(1));
    assert_eq!(m.apply(Command::Advance).unwrap().state, StateTag::Warmup(2));

    let v = m.apply(Command::Advance).unwrap();
    assert_eq!(v.state, StateTag::WorkingSet);
    assert_eq!(v.prescription, Some(Prescription { weight: 95.0, reps: 5 }));
    assert_eq!(v.plates.as_deref(), Some(&[25.0, 10.0, 2.5][..]));
    assert!(!v.commands.contains(&CommandKind::FinishExercise));

    let v = m.apply(log(7, Rating::Hard)).unwrap();
    assert_eq!(v.state, StateTag::Rest(90));
    assert_eq!(v.prescription, Some(Prescription { weight: 95.0, reps: 7 }));
    assert!(v.commands.contains(&CommandKind::FinishExercise));

    m.apply(Command::Advance).unwrap();
    let v = m.apply(log(8, Rating::Easy)).unwrap();
    assert_eq!(v.prescription, Some(Prescription { weight: 97.5, reps: 8 }));

    clock.advance(Duration::from_secs(30));
    assert_eq!(m.tick().remaining_seconds, Some(60));
    m.apply(Command::Advance).unwrap();
    let v = m.apply(log(8, Rating::Easy)).unwrap();

    // end of squat: ExerciseState written, rest before curls
    assert_eq!(v.state, StateTag::Rest(90));
    let result = v.last_result.unwrap();
    assert_eq!(result.exercise_id, "squat");
    assert_eq!(result.decision, Decision::EscalateSingle);
    assert_eq!(result.next_start.start_weight, 100.0);
    let states = store.load_exercise_states().unwrap();
    assert_eq!(states["squat"].next_start_load, 100.0);
    assert_eq!(states["squat"].last_start_load, 95.0);

    let attempt = &m.session().unwrap().attempts[0];
    assert_eq!(attempt.id, "20260302T070000/0");
    assert_eq!(attempt.sets[2].actual_weight, 97.5);
    assert_eq!(m.session().unwrap().stats.total_volume, 95.0 * 7.0 + 95.0 * 8.0 + 97.5 * 8.0);

    // dumbbells later in the session do not warm up
    let v = m.apply(Command::Advance).unwrap();
    assert_eq!(v.state, StateTag::WorkingSet);
    let ex = v.exercise.unwrap();
    assert_eq!((ex.id.as_str(), ex.index, ex.of), ("curl", 1, 2));
    assert_eq!(v.prescription, Some(Prescription { weight: 12.0, reps: 8 }));

    m.apply(log(10, Rating::Hard)).unwrap();
    m.apply(Command::Advance).unwrap();
    assert_eq!(m.apply(log(9, Rating::Hard)).unwrap().state, StateTag::Review);

    let v = m.apply(Command::Advance).unwrap();
    assert_eq!(v.state, StateTag::Done);
    assert!(store.snapshot_bytes().is_none());
    let history = store.history();
    assert_eq!(history.len(), 1);
    assert!(!history[0].active);
    assert_eq!(history[0].position.state, StateTag::Done);
    assert_eq!(history[0].stats.sets_logged, 5);

    assert_eq!(m.apply(Command::Advance).unwrap().state, StateTag::Intro);

    // the next session starts squats at the carried-over load
    clock.advance(Duration::from_secs(2 * 86_400));
    let v = start_squat(&mut m);
    assert_eq!(v.prescription, Some(Prescription { weight: 100.0, reps: 5 }));
}

#[test]
fn commands_outside_their_state_are_rejected_without_mutation() {
    let store = MemoryStore::new();
    let mut m = SessionMachine::new(catalog(), settings(), store.clone(), clock());

    let err = m.apply(log(5, Rating::Easy)).unwrap_err();
    match err.downcast_ref::<EngineError>() {
        Some(EngineError::InvalidCommand { state, command }) => {
            assert_eq!(state, "intro");
            assert_eq!(*command, "log-set");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(m.state(), StateTag::Intro);

    start_squat(&mut m);
    let writes = store.write_count();
    assert!(m.apply(Command::AdjustRest(30)).is_err());
    assert!(m.apply(Command::FinishExercise).is_err());
    assert!(m.apply(Command::Retry).is_err());
    assert!(m.apply(log(101, Rating::Easy)).is_err());
    assert!(
        m.apply(Command::LogSet {
            reps: 5,
            rating: Rating::Easy,
            weight: Some(-1.0),
        })
        .is_err()
    );
    assert_eq!(m.state(), StateTag::WorkingSet);
    assert_eq!(store.write_count(), writes);
}

#[test]
fn unknown_workout_is_a_contract_error() {
    let mut m = SessionMachine::new(catalog(), settings(), MemoryStore::new(), clock());
    m.apply(Command::Begin).unwrap();
    let err = m.apply(Command::SelectWorkout("upper".into())).unwrap_err();
    assert!(matches!(err.downcast_ref::<EngineError>(), Some(EngineError::Contract(_))));
    assert_eq!(m.state(), StateTag::WorkoutSelection);
}

#[test]
fn rest_adjustment_floors_at_zero_and_never_leaves_rest() {
    let mut m = SessionMachine::new(catalog(), settings(), MemoryStore::new(), clock());
    start_squat(&mut m);
    m.apply(log(6, Rating::Hard)).unwrap();

    assert_eq!(m.apply(Command::AdjustRest(30)).unwrap().state, StateTag::Rest(120));
    assert_eq!(m.apply(Command::AdjustRest(-500)).unwrap().state, StateTag::Rest(0));
    assert_eq!(m.tick().state, StateTag::Rest(0));
    assert_eq!(m.apply(Command::Advance).unwrap().state, StateTag::WorkingSet);
}

#[test]
fn timers_count_down_from_absolute_start() {
    let clock = clock();
    let mut m = SessionMachine::new(catalog(), settings(), MemoryStore::new(), clock.clone());
    start_squat(&mut m);
    m.apply(log(6, Rating::Hard)).unwrap();

    clock.advance(Duration::from_millis(45_500));
    assert_eq!(m.tick().remaining_seconds, Some(45));
    clock.advance(Duration::from_secs(600));
    let v = m.tick();
    assert_eq!(v.state, StateTag::Rest(0));
    assert!(m.countdown().is_some());
    assert_eq!(m.apply(Command::Advance).unwrap().state, StateTag::WorkingSet);
    assert!(m.countdown().is_none());
}

#[test]
fn finishing_early_judges_against_the_plan() {
    let store = MemoryStore::new();
    let mut m = SessionMachine::new(catalog(), settings(), store.clone(), clock());
    start_squat(&mut m);
    m.apply(log(8, Rating::Easy)).unwrap();

    // one easy set of three planned: meet < total - 1
    let v = m.apply(Command::FinishExercise).unwrap();
    assert_eq!(v.state, StateTag::Rest(90));
    assert_eq!(v.last_result.unwrap().decision, Decision::Reduce);
    assert_eq!(store.load_exercise_states().unwrap()["squat"].next_start_load, 90.0);
    assert!(!m.available_commands().contains(&CommandKind::FinishExercise));
}

#[test]
fn bad_start_triggers_emergency_drop_once() {
    let mut m = SessionMachine::new(catalog(), settings(), MemoryStore::new(), clock());
    start_squat(&mut m);

    let v = m.apply(log(3, Rating::Fail)).unwrap();
    assert_eq!(v.prescription, Some(Prescription { weight: 90.0, reps: 5 }));
    m.apply(Command::Advance).unwrap();
    let v = m.apply(log(4, Rating::VeryHard)).unwrap();
    assert_eq!(v.prescription, Some(Prescription { weight: 85.0, reps: 5 }));
    assert!(m.session().unwrap().attempts[0].emergency_drop);
}

#[test]
fn abandon_clears_memory_and_store() {
    let store = MemoryStore::new();
    let mut m = SessionMachine::new(catalog(), settings(), store.clone(), clock());
    start_squat(&mut m);
    m.apply(log(6, Rating::Hard)).unwrap();
    assert!(store.snapshot_bytes().is_some());

    let v = m.apply(Command::Abandon).unwrap();
    assert_eq!(v.state, StateTag::Intro);
    assert!(v.session_id.is_none());
    assert!(store.snapshot_bytes().is_none());
    assert!(store.history().is_empty());
}
