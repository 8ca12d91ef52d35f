//! Persistence seam for sessions and per-exercise progression state.

use crate::error::StoreError;
use crate::model::{ExerciseState, Session};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage collaborator.
///
/// Save calls are on the critical path and must be durable when they
/// return `Ok`. The machine degrades failed loads to "no prior state".
pub trait SessionStore {
    fn save_session_snapshot(&mut self, session: &Session) -> StoreResult<()>;
    fn load_active_session(&self) -> StoreResult<Option<Session>>;
    fn clear_active_session(&mut self) -> StoreResult<()>;
    /// Append a finished session to history. Re-archiving the same id overwrites it.
    fn archive_session(&mut self, session: &Session) -> StoreResult<()>;
    fn save_exercise_state(&mut self, exercise_id: &str, state: &ExerciseState) -> StoreResult<()>;
    /// Drop the stored state for `exercise_id`. Removing an absent id is not an error.
    fn remove_exercise_state(&mut self, exercise_id: &str) -> StoreResult<()>;
    fn load_exercise_states(&self) -> StoreResult<BTreeMap<String, ExerciseState>>;
    /// Starting loads used for `exercise_id` in sessions dated within the
    /// last `since_days` days as of `now` (today counts as day 0), the
    /// active session included.
    fn recent_start_loads(&self, exercise_id: &str, since_days: u32, now: DateTime<Utc>) -> StoreResult<Vec<f64>>;
}

/// Whether a session dated `session_date` falls in the recent window.
pub fn within_days(session_date: chrono::NaiveDate, since_days: u32, now: DateTime<Utc>) -> bool {
    let age = (now.date_naive() - session_date).num_days();
    (0..i64::from(since_days)).contains(&age)
}

/// Start loads of every attempt of `exercise_id` across `sessions`.
pub(crate) fn collect_start_loads<'a>(
    sessions: impl Iterator<Item = &'a Session>,
    exercise_id: &str,
    since_days: u32,
    now: DateTime<Utc>,
) -> Vec<f64> {
    sessions
        .filter(|s| within_days(s.date, since_days, now))
        .flat_map(|s| s.attempts.iter())
        .filter(|a| a.exercise_id == exercise_id)
        .map(|a| a.start_weight)
        .collect()
}
