//! `From` implementations bridging `overload_config` types to runtime types.
//!
//! The catalog must already be validated (`Config::validate`); references that
//! cannot be resolved surface as `EngineError::Config`.

use crate::config::{
    Catalog, Equipment, ExerciseConfig, PlateSet, RepRange, SessionSettings, WarmupMode,
    WorkoutEntry, WorkoutTemplate,
};
use crate::error::{EngineError, Result};

impl From<overload_config::Equipment> for Equipment {
    fn from(e: overload_config::Equipment) -> Self {
        use overload_config::Equipment as E;
        match e {
            E::Barbell => Self::Barbell,
            E::Dumbbell => Self::Dumbbell,
            E::Kettlebell => Self::Kettlebell,
            E::Machine => Self::Machine,
            E::Cable => Self::Cable,
            E::Bodyweight => Self::Bodyweight,
            E::Cardio => Self::Cardio,
        }
    }
}

impl From<overload_config::WarmupMode> for WarmupMode {
    fn from(m: overload_config::WarmupMode) -> Self {
        match m {
            overload_config::WarmupMode::Auto => Self::Auto,
            overload_config::WarmupMode::Full => Self::Full,
            overload_config::WarmupMode::Off => Self::Off,
        }
    }
}

impl From<&overload_config::PlateSetCfg> for PlateSet {
    fn from(c: &overload_config::PlateSetCfg) -> Self {
        PlateSet::new(c.bar_weight, c.plates.clone())
    }
}

impl From<&overload_config::SessionCfg> for SessionSettings {
    fn from(c: &overload_config::SessionCfg) -> Self {
        Self {
            rest_seconds: c.rest_seconds,
            stretch_seconds: c.stretch_seconds,
            stale_after_hours: c.stale_after_hours,
            recent_load_days: c.recent_load_days,
        }
    }
}

impl From<&overload_config::WorkoutCfg> for WorkoutTemplate {
    fn from(c: &overload_config::WorkoutCfg) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone().unwrap_or_else(|| c.id.clone()),
            entries: c
                .exercises
                .iter()
                .map(|e| WorkoutEntry {
                    exercise_id: e.exercise.clone(),
                    sets: e.sets,
                })
                .collect(),
        }
    }
}

fn exercise_from(cfg: &overload_config::Config, ex: &overload_config::ExerciseCfg) -> Result<ExerciseConfig> {
    let plates = match &ex.plate_set {
        Some(id) => Some(
            cfg.plate_set(id)
                .map(PlateSet::from)
                .ok_or_else(|| EngineError::Config(format!("exercise[{}] unknown plate_set '{id}'", ex.id)))?,
        ),
        None => None,
    };
    Ok(ExerciseConfig {
        id: ex.id.clone(),
        name: ex.name.clone().unwrap_or_else(|| ex.id.clone()),
        equipment: ex.equipment.into(),
        rep_range: RepRange::new(ex.reps.0, ex.reps.1),
        base_increment: ex.base_increment,
        rounding: ex.rounding,
        micro_step: ex.micro_step,
        weekly_cap_pct: ex.weekly_cap_pct,
        plates,
        warmup: ex.warmup.into(),
        start_weight: ex.start_weight,
        rest_seconds: ex.rest_seconds,
    })
}

impl TryFrom<&overload_config::Config> for Catalog {
    type Error = eyre::Report;

    fn try_from(cfg: &overload_config::Config) -> Result<Self> {
        let mut catalog = Catalog::new();
        for ex in &cfg.exercises {
            catalog = catalog.with_exercise(exercise_from(cfg, ex)?);
        }
        for w in &cfg.workouts {
            let template = WorkoutTemplate::from(w);
            if let Some(missing) = template
                .entries
                .iter()
                .find(|e| catalog.exercise(&e.exercise_id).is_none())
            {
                return Err(EngineError::Config(format!(
                    "workout[{}] references unknown exercise '{}'",
                    template.id, missing.exercise_id
                ))
                .into());
            }
            catalog = catalog.with_workout(template);
        }
        Ok(catalog)
    }
}
