//! Runtime configuration consumed by the engine and the session machine.
//!
//! These are the validated, read-only forms of the TOML catalog; see
//! `conversions` for the mapping from `overload_config`.

use crate::plates::round_to_plates;
use crate::rounding::round_to;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive target rep range. `min <= max` is enforced at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min: u32,
    pub max: u32,
}

impl RepRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, reps: u32) -> u32 {
        reps.clamp(self.min, self.max.max(self.min))
    }

    #[inline]
    pub fn contains(&self, reps: u32) -> bool {
        (self.min..=self.max).contains(&reps)
    }
}

/// Per-side plate units (sorted descending) and the fixed bar weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateSet {
    pub bar_weight: f64,
    pub plates: Vec<f64>,
}

impl PlateSet {
    pub fn new(bar_weight: f64, mut plates: Vec<f64>) -> Self {
        plates.sort_by(|a, b| b.total_cmp(a));
        Self { bar_weight, plates }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Cable,
    Bodyweight,
    Cardio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmupMode {
    #[default]
    Auto,
    Full,
    Off,
}

/// Static description of one exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseConfig {
    pub id: String,
    pub name: String,
    pub equipment: Equipment,
    pub rep_range: RepRange,
    pub base_increment: f64,
    pub rounding: f64,
    pub micro_step: Option<f64>,
    /// Maximum week-over-week increase of the starting load, in percent.
    pub weekly_cap_pct: f64,
    pub plates: Option<PlateSet>,
    pub warmup: WarmupMode,
    pub start_weight: Option<f64>,
    pub rest_seconds: Option<u32>,
}

impl ExerciseConfig {
    /// Machine exercise with a 10% weekly cap and no optional features.
    pub fn new(id: impl Into<String>, rep_range: RepRange, base_increment: f64, rounding: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            equipment: Equipment::Machine,
            rep_range,
            base_increment,
            rounding,
            micro_step: None,
            weekly_cap_pct: 10.0,
            plates: None,
            warmup: WarmupMode::Auto,
            start_weight: None,
            rest_seconds: None,
        }
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_micro_step(mut self, step: f64) -> Self {
        self.micro_step = Some(step);
        self
    }

    pub fn with_plates(mut self, plates: PlateSet) -> Self {
        self.plates = Some(plates);
        self
    }

    pub fn with_start_weight(mut self, w: f64) -> Self {
        self.start_weight = Some(w);
        self
    }

    pub fn with_weekly_cap_pct(mut self, pct: f64) -> Self {
        self.weekly_cap_pct = pct;
        self
    }

    pub fn with_warmup(mut self, mode: WarmupMode) -> Self {
        self.warmup = mode;
        self
    }

    pub fn bar_weight(&self) -> Option<f64> {
        self.plates.as_ref().map(|p| p.bar_weight)
    }

    /// Round to the configured granularity, then to plates when present.
    pub fn loadable(&self, weight: f64) -> f64 {
        let w = round_to(weight, self.rounding);
        match &self.plates {
            Some(p) => round_to_plates(w, &p.plates, p.bar_weight),
            None => w.max(0.0),
        }
    }

    /// Starting load for the very first occurrence of this exercise.
    pub fn initial_weight(&self) -> f64 {
        match (self.start_weight, self.bar_weight()) {
            (Some(w), _) => self.loadable(w),
            (None, Some(bar)) => bar,
            (None, None) => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutEntry {
    pub exercise_id: String,
    pub sets: u32,
}

/// Ordered exercise list for one workout.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    pub entries: Vec<WorkoutEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    pub rest_seconds: u32,
    /// 0 disables the stretching step.
    pub stretch_seconds: u32,
    pub stale_after_hours: u32,
    pub recent_load_days: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            rest_seconds: 120,
            stretch_seconds: 0,
            stale_after_hours: 24,
            recent_load_days: 7,
        }
    }
}

impl SessionSettings {
    pub fn stale_after(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.stale_after_hours))
    }
}

/// Read-only exercise and workout catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    exercises: BTreeMap<String, ExerciseConfig>,
    workouts: Vec<WorkoutTemplate>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exercise(mut self, cfg: ExerciseConfig) -> Self {
        self.exercises.insert(cfg.id.clone(), cfg);
        self
    }

    pub fn with_workout(mut self, workout: WorkoutTemplate) -> Self {
        self.workouts.retain(|w| w.id != workout.id);
        self.workouts.push(workout);
        self
    }

    pub fn exercise(&self, id: &str) -> Option<&ExerciseConfig> {
        self.exercises.get(id)
    }

    pub fn workout(&self, id: &str) -> Option<&WorkoutTemplate> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &ExerciseConfig> {
        self.exercises.values()
    }

    pub fn workouts(&self) -> &[WorkoutTemplate] {
        &self.workouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_range() {
        let r = RepRange::new(6, 10);
        assert_eq!(r.clamp(3), 6);
        assert_eq!(r.clamp(8), 8);
        assert_eq!(r.clamp(14), 10);
    }

    #[test]
    fn initial_weight_prefers_start_then_bar() {
        let base = ExerciseConfig::new("squat", RepRange::new(5, 8), 5.0, 2.5);
        assert_eq!(base.initial_weight(), 0.0);
        let barbell = base
            .clone()
            .with_plates(PlateSet::new(20.0, vec![20.0, 10.0, 5.0, 2.5, 1.25]));
        assert_eq!(barbell.initial_weight(), 20.0);
        // 61 -> 60 (rounding) -> 20 + 2*(20) = 60 on plates
        assert_eq!(barbell.with_start_weight(61.0).initial_weight(), 60.0);
    }

    #[test]
    fn plate_set_sorts_descending() {
        let p = PlateSet::new(20.0, vec![2.5, 20.0, 10.0]);
        assert_eq!(p.plates, vec![20.0, 10.0, 2.5]);
    }
}
