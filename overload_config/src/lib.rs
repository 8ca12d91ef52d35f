#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Catalog schema and plate-inventory parsing for the training engine.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Plate inventory CSV loader enforces headers and expands per-side counts
//!   into the list of usable plate units the greedy loader consumes.
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Plate inventory CSV schema.
///
/// Expected headers:
/// weight,count
///
/// `count` is the number of plates of that weight available for ONE side of the bar.
///
/// Example:
/// weight,count
/// 20,2
/// 10,1
/// 2.5,1
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlateRow {
    pub weight: f64,
    pub count: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Equipment {
    #[default]
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Cable,
    Bodyweight,
    Cardio,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarmupMode {
    /// Equipment policy decides, based on exercise position.
    #[default]
    Auto,
    /// Always use the first-exercise ramp.
    Full,
    /// Never warm up.
    Off,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionCfg {
    /// Rest countdown between sets (seconds).
    pub rest_seconds: u32,
    /// Stretch countdown before the first exercise (seconds, 0 disables).
    pub stretch_seconds: u32,
    /// Persisted snapshots older than this are discarded on resume.
    pub stale_after_hours: u32,
    /// Window handed to the weekly cap as "recent" loads.
    pub recent_load_days: u32,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self {
            rest_seconds: 120,
            stretch_seconds: 0,
            stale_after_hours: 24,
            recent_load_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    /// Directory holding the active snapshot, exercise states and history.
    pub data_dir: String,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlateSetCfg {
    pub id: String,
    pub bar_weight: f64,
    /// Per-side plate units; repeats mean more than one plate of that weight.
    #[serde(default)]
    pub plates: Vec<f64>,
    /// Alternative to `plates`: a `weight,count` CSV resolved relative to the config file.
    #[serde(default)]
    pub csv: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExerciseCfg {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub equipment: Equipment,
    /// Target rep range `[min, max]`.
    pub reps: (u32, u32),
    pub base_increment: f64,
    pub rounding: f64,
    #[serde(default)]
    pub micro_step: Option<f64>,
    #[serde(default = "default_weekly_cap_pct")]
    pub weekly_cap_pct: f64,
    /// Reference into `[[plate_set]]`.
    #[serde(default)]
    pub plate_set: Option<String>,
    #[serde(default)]
    pub warmup: WarmupMode,
    /// Load used the first time the exercise is calibrated.
    #[serde(default)]
    pub start_weight: Option<f64>,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
}

fn default_weekly_cap_pct() -> f64 {
    10.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkoutEntryCfg {
    pub exercise: String,
    #[serde(default = "default_sets")]
    pub sets: u32,
}

fn default_sets() -> u32 {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkoutCfg {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exercises: Vec<WorkoutEntryCfg>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub storage: StorageCfg,
    #[serde(default, rename = "plate_set")]
    pub plate_sets: Vec<PlateSetCfg>,
    #[serde(rename = "exercise")]
    pub exercises: Vec<ExerciseCfg>,
    #[serde(default, rename = "workout")]
    pub workouts: Vec<WorkoutCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse, resolve plate CSV files and validate a catalog file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {:?}: {}", path, e))?;
    let mut cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {:?}: {}", path, e))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    cfg.resolve_plate_files(base)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load a plate inventory CSV and expand it into per-side plate units, sorted descending.
pub fn load_plate_csv(path: &Path) -> eyre::Result<Vec<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open plate CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["weight", "count"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "plate CSV must have headers 'weight,count', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<PlateRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    expand_plate_rows(&rows)
}

/// Expand `(weight, count)` rows into plate units, largest first.
pub fn expand_plate_rows(rows: &[PlateRow]) -> eyre::Result<Vec<f64>> {
    let mut plates = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        if !(row.weight.is_finite() && row.weight > 0.0) {
            eyre::bail!("plate row {} weight must be > 0", idx + 1);
        }
        for _ in 0..row.count {
            plates.push(row.weight);
        }
    }
    sort_descending(&mut plates);
    Ok(plates)
}

fn sort_descending(plates: &mut [f64]) {
    plates.sort_by(|a, b| b.total_cmp(a));
}

impl Config {
    /// Replace `csv = ...` plate sets with their loaded units.
    pub fn resolve_plate_files(&mut self, base_dir: &Path) -> eyre::Result<()> {
        for set in &mut self.plate_sets {
            if let Some(file) = &set.csv {
                if !set.plates.is_empty() {
                    eyre::bail!("plate_set[{}] sets both plates and csv", set.id);
                }
                set.plates = load_plate_csv(&base_dir.join(file))?;
            }
        }
        Ok(())
    }

    pub fn exercise(&self, id: &str) -> Option<&ExerciseCfg> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn plate_set(&self, id: &str) -> Option<&PlateSetCfg> {
        self.plate_sets.iter().find(|p| p.id == id)
    }

    pub fn workout(&self, id: &str) -> Option<&WorkoutCfg> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn validate(&self) -> eyre::Result<()> {
        // Session
        if self.session.rest_seconds > 60 * 60 {
            eyre::bail!("session.rest_seconds is unreasonably large (>1h)");
        }
        if self.session.stretch_seconds > 60 * 60 {
            eyre::bail!("session.stretch_seconds is unreasonably large (>1h)");
        }
        if self.session.stale_after_hours == 0 {
            eyre::bail!("session.stale_after_hours must be >= 1");
        }
        if self.session.recent_load_days == 0 {
            eyre::bail!("session.recent_load_days must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref() {
            if !matches!(rot, "never" | "daily" | "hourly") {
                eyre::bail!("logging.rotation must be one of never|daily|hourly");
            }
        }

        // Plate sets
        let mut plate_ids = HashSet::new();
        for set in &self.plate_sets {
            if !plate_ids.insert(set.id.as_str()) {
                eyre::bail!("duplicate plate_set id '{}'", set.id);
            }
            if !(set.bar_weight.is_finite() && set.bar_weight >= 0.0) {
                eyre::bail!("plate_set[{}].bar_weight must be >= 0", set.id);
            }
            if set.plates.is_empty() && set.csv.is_none() {
                eyre::bail!("plate_set[{}] needs plates or csv", set.id);
            }
            if set.plates.iter().any(|p| !(p.is_finite() && *p > 0.0)) {
                eyre::bail!("plate_set[{}].plates must all be > 0", set.id);
            }
        }

        // Exercises
        if self.exercises.is_empty() {
            eyre::bail!("catalog must define at least one [[exercise]]");
        }
        let mut exercise_ids = HashSet::new();
        for ex in &self.exercises {
            let id = ex.id.as_str();
            if id.is_empty() {
                eyre::bail!("exercise id must not be empty");
            }
            if !exercise_ids.insert(id) {
                eyre::bail!("duplicate exercise id '{id}'");
            }
            let (min, max) = ex.reps;
            if min > max {
                eyre::bail!("exercise[{id}].reps min must be <= max");
            }
            if min == 0 || max > 100 {
                eyre::bail!("exercise[{id}].reps must lie in [1, 100]");
            }
            if !(ex.base_increment.is_finite() && ex.base_increment >= 0.0) {
                eyre::bail!("exercise[{id}].base_increment must be >= 0");
            }
            if !(ex.rounding.is_finite() && ex.rounding > 0.0) {
                eyre::bail!("exercise[{id}].rounding must be > 0");
            }
            if let Some(step) = ex.micro_step {
                if !(step.is_finite() && step > 0.0) {
                    eyre::bail!("exercise[{id}].micro_step must be > 0");
                }
            }
            if !(ex.weekly_cap_pct.is_finite() && (0.0..=100.0).contains(&ex.weekly_cap_pct)) {
                eyre::bail!("exercise[{id}].weekly_cap_pct must be in [0, 100]");
            }
            if let Some(w) = ex.start_weight {
                if !(w.is_finite() && w >= 0.0) {
                    eyre::bail!("exercise[{id}].start_weight must be >= 0");
                }
            }
            if let Some(rest) = ex.rest_seconds {
                if rest > 60 * 60 {
                    eyre::bail!("exercise[{id}].rest_seconds is unreasonably large (>1h)");
                }
            }
            if let Some(set) = ex.plate_set.as_deref() {
                if !plate_ids.contains(set) {
                    eyre::bail!("exercise[{id}] references unknown plate_set '{set}'");
                }
            }
        }

        // Workouts
        let mut workout_ids = HashSet::new();
        for w in &self.workouts {
            if !workout_ids.insert(w.id.as_str()) {
                eyre::bail!("duplicate workout id '{}'", w.id);
            }
            if w.exercises.is_empty() {
                eyre::bail!("workout[{}] must list at least one exercise", w.id);
            }
            for entry in &w.exercises {
                if !exercise_ids.contains(entry.exercise.as_str()) {
                    eyre::bail!(
                        "workout[{}] references unknown exercise '{}'",
                        w.id,
                        entry.exercise
                    );
                }
                if entry.sets == 0 || entry.sets > 20 {
                    eyre::bail!(
                        "workout[{}].{} sets must be in [1, 20]",
                        w.id,
                        entry.exercise
                    );
                }
            }
        }

        Ok(())
    }
}
