//! Read cache for per-exercise progression state.
//!
//! Owned by the session machine. A failed load is not cached, so the next
//! read retries the store.

use crate::model::ExerciseState;
use crate::store::SessionStore;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct LoadCache {
    states: Option<BTreeMap<String, ExerciseState>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure<S: SessionStore>(&mut self, store: &S) -> Option<&BTreeMap<String, ExerciseState>> {
        if self.states.is_none() {
            self.refresh(store);
        }
        self.states.as_ref()
    }

    /// Cached state for `exercise_id`, loading from `store` on a miss.
    pub fn get<S: SessionStore>(&mut self, store: &S, exercise_id: &str) -> Option<ExerciseState> {
        self.ensure(store).and_then(|m| m.get(exercise_id).cloned())
    }

    /// Record a state the store has just accepted.
    pub fn put(&mut self, exercise_id: &str, state: ExerciseState) {
        if let Some(m) = self.states.as_mut() {
            m.insert(exercise_id.to_string(), state);
        }
    }

    /// Put back a state (or its absence) after the store was rolled back.
    pub fn restore(&mut self, exercise_id: &str, state: Option<ExerciseState>) {
        if let Some(m) = self.states.as_mut() {
            match state {
                Some(s) => {
                    m.insert(exercise_id.to_string(), s);
                }
                None => {
                    m.remove(exercise_id);
                }
            }
        }
    }

    pub fn invalidate(&mut self) {
        self.states = None;
    }

    /// Reload from the store now. Returns whether the load succeeded.
    pub fn refresh<S: SessionStore>(&mut self, store: &S) -> bool {
        match store.load_exercise_states() {
            Ok(m) => {
                self.states = Some(m);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "loading exercise states failed; using defaults");
                self.states = None;
                false
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.states.is_some()
    }
}
