#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use overload_core::config::{WorkoutEntry, WorkoutTemplate};
use overload_core::{
    Catalog, Command, Equipment, ExerciseConfig, PlateSet, Rating, RepRange, SessionMachine,
    SessionSettings, SessionStore, View,
};
use overload_traits::ManualClock;

pub fn olympic() -> PlateSet {
    PlateSet::new(
        20.0,
        vec![25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 2.5, 1.25, 1.25],
    )
}

/// Squat (barbell, 3 sets) followed by curls (dumbbell, 2 sets).
pub fn catalog() -> Catalog {
    let squat = ExerciseConfig::new("squat", RepRange::new(5, 8), 5.0, 2.5)
        .with_equipment(Equipment::Barbell)
        .with_micro_step(2.5)
        .with_plates(olympic())
        .with_start_weight(95.0);
    let curl = ExerciseConfig::new("curl", RepRange::new(8, 12), 2.0, 1.0)
        .with_equipment(Equipment::Dumbbell)
        .with_start_weight(12.0);
    Catalog::new()
        .with_exercise(squat)
        .with_exercise(curl)
        .with_workout(WorkoutTemplate {
            id: "lower".into(),
            name: "Lower".into(),
            entries: vec![
                WorkoutEntry {
                    exercise_id: "squat".into(),
                    sets: 3,
                },
                WorkoutEntry {
                    exercise_id: "curl".into(),
                    sets: 2,
                },
            ],
        })
}

pub fn settings() -> SessionSettings {
    SessionSettings {
        rest_seconds: 90,
        ..SessionSettings::default()
    }
}

pub fn clock() -> ManualClock {
    ManualClock::starting_at(Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap())
}

pub fn log(reps: u32, rating: Rating) -> Command {
    Command::LogSet {
        reps,
        rating,
        weight: None,
    }
}

/// Begin, select `lower`, and advance to the first squat working set.
pub fn start_squat<S: SessionStore>(m: &mut SessionMachine<S, ManualClock>) -> View {
    m.apply(Command::Begin).unwrap();
    m.apply(Command::SelectWorkout("lower".into())).unwrap();
    m.apply(Command::Advance).unwrap();
    m.apply(Command::Advance).unwrap();
    m.apply(Command::SkipWarmup).unwrap()
}
