//! Equipment-aware warm-up ramps.
//!
//! Each equipment class maps to a fixed ramp of `(fraction of working
//! weight, reps)`. Steps that would not be strictly lighter than the
//! working weight, or not heavier than the previous step once rounded, are
//! dropped, so light working weights produce short or empty ramps.

use crate::config::{Equipment, ExerciseConfig, WarmupMode};
use crate::plates::round_to_plates;
use crate::rounding::{WEIGHT_EPS, round_to};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WarmupStep {
    pub weight: f64,
    pub reps: u32,
    pub step_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarmupPlan {
    pub needs_warmup: bool,
    pub steps: Vec<WarmupStep>,
}

/// Where the exercise sits in today's workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Later,
}

impl Slot {
    pub fn of_index(index: usize) -> Self {
        if index == 0 { Slot::First } else { Slot::Later }
    }
}

type Ramp = &'static [(f64, u32)];

fn barbell(slot: Slot) -> Ramp {
    match slot {
        Slot::First => &[(0.50, 8), (0.65, 5), (0.80, 3)],
        Slot::Later => &[(0.85, 2)],
    }
}

fn free_weight(slot: Slot) -> Ramp {
    match slot {
        Slot::First => &[(0.50, 10), (0.75, 5)],
        Slot::Later => &[],
    }
}

fn stack(slot: Slot) -> Ramp {
    match slot {
        Slot::First => &[(0.50, 10), (0.70, 6), (0.85, 3)],
        Slot::Later => &[(0.85, 3)],
    }
}

fn ramp_for(equipment: Equipment, slot: Slot) -> Ramp {
    match equipment {
        Equipment::Barbell => barbell(slot),
        Equipment::Dumbbell | Equipment::Kettlebell => free_weight(slot),
        Equipment::Machine | Equipment::Cable => stack(slot),
        Equipment::Bodyweight | Equipment::Cardio => &[],
    }
}

/// Warm-up ramp for `working_weight` at the given position in the session.
pub fn generate_warmup(
    equipment: Equipment,
    working_weight: f64,
    slot: Slot,
    cfg: &ExerciseConfig,
) -> WarmupPlan {
    let slot = match cfg.warmup {
        WarmupMode::Off => return WarmupPlan::default(),
        WarmupMode::Full => Slot::First,
        WarmupMode::Auto => slot,
    };
    let floor = match equipment {
        Equipment::Barbell => cfg.bar_weight().unwrap_or(0.0),
        _ => 0.0,
    };

    let mut steps: Vec<WarmupStep> = Vec::new();
    for &(fraction, reps) in ramp_for(equipment, slot) {
        let mut w = round_to(working_weight * fraction, cfg.rounding);
        if let Some(p) = &cfg.plates {
            w = round_to_plates(w, &p.plates, p.bar_weight);
        }
        let w = w.max(floor);
        let heavier_than_prev = steps.last().is_none_or(|s| w > s.weight + WEIGHT_EPS);
        if w > WEIGHT_EPS && w + WEIGHT_EPS < working_weight && heavier_than_prev {
            steps.push(WarmupStep {
                weight: w,
                reps,
                step_index: steps.len(),
            });
        }
    }
    WarmupPlan {
        needs_warmup: !steps.is_empty(),
        steps,
    }
}
