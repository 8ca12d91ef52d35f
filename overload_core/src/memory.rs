//! In-memory `SessionStore`.
//!
//! Sessions are kept as serialized JSON so that loads exercise the same
//! serde path as the file store. Clones share one backing store, which lets
//! tests drop a machine and resume a new one against the same data.
//! Individual operations can be made to fail for storage-error tests.

use crate::error::StoreError;
use crate::model::{ExerciseState, Session};
use crate::store::{SessionStore, StoreResult, collect_start_loads};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Operation selector for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreOp {
    SaveSnapshot,
    LoadActive,
    Clear,
    Archive,
    SaveExerciseState,
    LoadExerciseStates,
    RecentLoads,
}

#[derive(Debug, Default)]
struct Inner {
    active: Option<Vec<u8>>,
    history: BTreeMap<String, Vec<u8>>,
    states: BTreeMap<String, ExerciseState>,
    failing: Vec<StoreOp>,
    writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))
    }

    fn check(inner: &Inner, op: StoreOp) -> StoreResult<()> {
        if inner.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("injected failure on {op:?}")));
        }
        Ok(())
    }

    /// Make `op` fail until [`MemoryStore::heal`] is called.
    pub fn fail_on(&self, op: StoreOp) {
        if let Ok(mut g) = self.inner.lock() {
            if !g.failing.contains(&op) {
                g.failing.push(op);
            }
        }
    }

    pub fn heal(&self) {
        if let Ok(mut g) = self.inner.lock() {
            g.failing.clear();
        }
    }

    /// Raw bytes of the active snapshot.
    pub fn snapshot_bytes(&self) -> Option<Vec<u8>> {
        self.inner.lock().ok().and_then(|g| g.active.clone())
    }

    pub fn history(&self) -> Vec<Session> {
        self.inner
            .lock()
            .map(|g| {
                g.history
                    .values()
                    .filter_map(|b| serde_json::from_slice(b).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of successful writes of any kind.
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|g| g.writes).unwrap_or(0)
    }

    /// Seed a past session directly into history.
    pub fn insert_history(&self, session: &Session) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(session)?;
        self.lock()?.history.insert(session.id.clone(), bytes);
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn save_session_snapshot(&mut self, session: &Session) -> StoreResult<()> {
        let mut g = self.lock()?;
        Self::check(&g, StoreOp::SaveSnapshot)?;
        g.active = Some(serde_json::to_vec_pretty(session)?);
        g.writes += 1;
        Ok(())
    }

    fn load_active_session(&self) -> StoreResult<Option<Session>> {
        let g = self.lock()?;
        Self::check(&g, StoreOp::LoadActive)?;
        match &g.active {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn clear_active_session(&mut self) -> StoreResult<()> {
        let mut g = self.lock()?;
        Self::check(&g, StoreOp::Clear)?;
        g.active = None;
        g.writes += 1;
        Ok(())
    }

    fn archive_session(&mut self, session: &Session) -> StoreResult<()> {
        let mut g = self.lock()?;
        Self::check(&g, StoreOp::Archive)?;
        let bytes = serde_json::to_vec_pretty(session)?;
        g.history.insert(session.id.clone(), bytes);
        g.writes += 1;
        Ok(())
    }

    fn save_exercise_state(&mut self, exercise_id: &str, state: &ExerciseState) -> StoreResult<()> {
        let mut g = self.lock()?;
        Self::check(&g, StoreOp::SaveExerciseState)?;
        g.states.insert(exercise_id.to_string(), state.clone());
        g.writes += 1;
        Ok(())
    }

    fn remove_exercise_state(&mut self, exercise_id: &str) -> StoreResult<()> {
        let mut g = self.lock()?;
        Self::check(&g, StoreOp::SaveExerciseState)?;
        g.states.remove(exercise_id);
        g.writes += 1;
        Ok(())
    }

    fn load_exercise_states(&self) -> StoreResult<BTreeMap<String, ExerciseState>> {
        let g = self.lock()?;
        Self::check(&g, StoreOp::LoadExerciseStates)?;
        Ok(g.states.clone())
    }

    fn recent_start_loads(&self, exercise_id: &str, since_days: u32, now: DateTime<Utc>) -> StoreResult<Vec<f64>> {
        let g = self.lock()?;
        Self::check(&g, StoreOp::RecentLoads)?;
        let mut sessions: Vec<Session> = Vec::new();
        for bytes in g.history.values() {
            sessions.push(serde_json::from_slice(bytes)?);
        }
        if let Some(bytes) = &g.active {
            let active: Session = serde_json::from_slice(bytes)?;
            if !g.history.contains_key(&active.id) {
                sessions.push(active);
            }
        }
        Ok(collect_start_loads(sessions.iter(), exercise_id, since_days, now))
    }
}
