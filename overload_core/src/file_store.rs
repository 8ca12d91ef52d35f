//! JSON-file `SessionStore` under a data directory.
//!
//! Layout:
//! - `active_session.json`: the in-progress snapshot
//! - `exercise_states.json`: map of exercise id to `ExerciseState`
//! - `history/<session-id>.json`: archived sessions
//!
//! Every write goes through [`write_atomic`].

use crate::model::{ExerciseState, Session};
use crate::store::{SessionStore, StoreResult, collect_start_loads};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::{fs, io};

const ACTIVE: &str = "active_session.json";
const STATES: &str = "exercise_states.json";
const HISTORY: &str = "history";

/// Write via a sibling temp file, fsync, then rename over the target.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("new");
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &bytes)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(dir.join(HISTORY))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_path(&self, id: &str) -> PathBuf {
        self.dir.join(HISTORY).join(format!("{id}.json"))
    }

    pub fn history(&self) -> StoreResult<Vec<Session>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(self.dir.join(HISTORY))? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "json") {
                if let Some(s) = read_json::<Session>(&path)? {
                    out.push(s);
                }
            }
        }
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }
}

impl SessionStore for FileStore {
    fn save_session_snapshot(&mut self, session: &Session) -> StoreResult<()> {
        write_json(&self.dir.join(ACTIVE), session)
    }

    fn load_active_session(&self) -> StoreResult<Option<Session>> {
        read_json(&self.dir.join(ACTIVE))
    }

    fn clear_active_session(&mut self) -> StoreResult<()> {
        match fs::remove_file(self.dir.join(ACTIVE)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn archive_session(&mut self, session: &Session) -> StoreResult<()> {
        write_json(&self.history_path(&session.id), session)
    }

    fn save_exercise_state(&mut self, exercise_id: &str, state: &ExerciseState) -> StoreResult<()> {
        let path = self.dir.join(STATES);
        let mut states: BTreeMap<String, ExerciseState> = read_json(&path)?.unwrap_or_default();
        states.insert(exercise_id.to_string(), state.clone());
        write_json(&path, &states)
    }

    fn remove_exercise_state(&mut self, exercise_id: &str) -> StoreResult<()> {
        let path = self.dir.join(STATES);
        let Some(mut states) = read_json::<BTreeMap<String, ExerciseState>>(&path)? else {
            return Ok(());
        };
        if states.remove(exercise_id).is_some() {
            write_json(&path, &states)?;
        }
        Ok(())
    }

    fn load_exercise_states(&self) -> StoreResult<BTreeMap<String, ExerciseState>> {
        Ok(read_json(&self.dir.join(STATES))?.unwrap_or_default())
    }

    fn recent_start_loads(&self, exercise_id: &str, since_days: u32, now: DateTime<Utc>) -> StoreResult<Vec<f64>> {
        let mut sessions = self.history()?;
        if let Some(active) = self.load_active_session()? {
            if !sessions.iter().any(|s| s.id == active.id) {
                sessions.push(active);
            }
        }
        Ok(collect_start_loads(sessions.iter(), exercise_id, since_days, now))
    }
}
