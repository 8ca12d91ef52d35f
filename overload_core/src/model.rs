//! Persisted session records.

use crate::adjust::{Prescription, Rating};
use crate::decision::Decision;
use crate::error::{EngineError, Result};
use crate::next_weight::NextStart;
use crate::rounding::snap;
use crate::state::StateTag;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged working set. Immutable once logged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetOutcome {
    /// 1-based.
    pub set_index: u32,
    pub target_reps: u32,
    pub target_weight: f64,
    pub achieved_reps: u32,
    pub rating: Rating,
    pub actual_weight: f64,
}

impl SetOutcome {
    pub fn volume(&self) -> f64 {
        f64::from(self.achieved_reps) * self.actual_weight
    }
}

/// A single occurrence of an exercise within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseAttempt {
    /// `<session-id>/<exercise-index>`.
    pub id: String,
    pub exercise_id: String,
    pub start_weight: f64,
    pub planned_sets: u32,
    pub sets: Vec<SetOutcome>,
    pub decision: Option<Decision>,
    pub next_start: Option<NextStart>,
    #[serde(default)]
    pub emergency_drop: bool,
}

impl ExerciseAttempt {
    pub fn new(session_id: &str, index: usize, exercise_id: &str, start_weight: f64, planned_sets: u32) -> Self {
        Self {
            id: format!("{session_id}/{index}"),
            exercise_id: exercise_id.to_string(),
            start_weight,
            planned_sets,
            sets: Vec::new(),
            decision: None,
            next_start: None,
            emergency_drop: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.decision.is_some()
    }

    pub fn all_sets_logged(&self) -> bool {
        self.sets.len() >= self.planned_sets as usize
    }

    pub fn log(&mut self, outcome: SetOutcome) -> Result<()> {
        if self.is_finished() {
            return Err(EngineError::Contract(format!(
                "attempt {} is finished; cannot log another set",
                self.id
            ))
            .into());
        }
        self.sets.push(outcome);
        Ok(())
    }

    /// Record the end-of-exercise outcome. Allowed exactly once.
    pub fn finish(&mut self, decision: Decision, next: NextStart) -> Result<()> {
        if self.is_finished() {
            return Err(EngineError::Contract(format!("attempt {} already finished", self.id)).into());
        }
        self.decision = Some(decision);
        self.next_start = Some(next);
        Ok(())
    }
}

/// Cross-session progression state of one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseState {
    pub last_start_load: f64,
    pub next_start_load: f64,
    pub last_decision: Decision,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Σ reps × actual weight over working sets.
    pub total_volume: f64,
    pub sets_logged: u32,
}

/// Where the machine stands inside the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub exercise_index: usize,
    /// 1-based index of the upcoming set.
    pub set_index: u32,
    pub state: StateTag,
    pub prescription: Option<Prescription>,
    /// Wall-clock start of the running countdown, if any.
    pub timer_started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub date: NaiveDate,
    pub workout_id: String,
    pub attempts: Vec<ExerciseAttempt>,
    pub stats: SessionStats,
    pub position: Position,
    pub active: bool,
    pub last_updated: DateTime<Utc>,
}

impl Session {
    pub fn new(workout_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: now.format("%Y%m%dT%H%M%S").to_string(),
            date: now.date_naive(),
            workout_id: workout_id.to_string(),
            attempts: Vec::new(),
            stats: SessionStats::default(),
            position: Position {
                exercise_index: 0,
                set_index: 1,
                state: StateTag::PreWorkout,
                prescription: None,
                timer_started_at: None,
            },
            active: true,
            last_updated: now,
        }
    }

    pub fn current_attempt(&self) -> Option<&ExerciseAttempt> {
        self.attempts.get(self.position.exercise_index)
    }

    pub fn current_attempt_mut(&mut self) -> Option<&mut ExerciseAttempt> {
        self.attempts.get_mut(self.position.exercise_index)
    }

    /// Most recent attempt with a recorded decision.
    pub fn last_finished(&self) -> Option<&ExerciseAttempt> {
        self.attempts.iter().rev().find(|a| a.is_finished())
    }

    pub fn recompute_stats(&mut self) {
        let sets = self.attempts.iter().flat_map(|a| a.sets.iter());
        let (volume, count) = sets.fold((0.0, 0u32), |(v, n), s| (v + s.volume(), n + 1));
        self.stats = SessionStats {
            total_volume: snap(volume),
            sets_logged: count,
        };
    }

    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.last_updated
    }
}
