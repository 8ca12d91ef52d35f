//! Starting load for the next occurrence of an exercise.

use crate::config::ExerciseConfig;
use crate::decision::Decision;
use crate::plates::round_to_plates;
use crate::rounding::{WEIGHT_EPS, round_to, snap};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStart {
    pub start_weight: f64,
    /// Human-readable trace of the computation. Never branched on.
    pub reason: String,
    pub cap_applied: bool,
}

/// Decision step, rounding, weekly cap, plates, floor at zero.
///
/// The weekly cap compares against the lowest load used within the recent
/// window, or `last_start_load` when there is none. It only ever lowers
/// the result.
pub fn compute_next_start(
    last_start_load: f64,
    decision: Decision,
    cfg: &ExerciseConfig,
    recent_loads: &[f64],
) -> NextStart {
    let delta = match decision {
        Decision::EscalateDouble => 2.0 * cfg.base_increment,
        Decision::EscalateSingle => cfg.base_increment,
        Decision::Reduce => -cfg.base_increment,
        Decision::Hold => 0.0,
    };
    let mut reason = format!("{decision}: {last_start_load} {delta:+}");
    let mut w = round_to(last_start_load + delta, cfg.rounding);
    let _ = write!(reason, " -> {w}");

    let max_increase = last_start_load * cfg.weekly_cap_pct / 100.0;
    let baseline = recent_loads
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .reduce(f64::min)
        .unwrap_or(last_start_load);
    let actual_increase = w - baseline;
    let mut cap_applied = false;
    if actual_increase > max_increase + WEIGHT_EPS {
        let capped = round_to(last_start_load + max_increase, cfg.rounding);
        if capped + WEIGHT_EPS < w {
            w = capped;
            cap_applied = true;
            let _ = write!(
                reason,
                "; weekly cap {}% over {baseline} applied -> {w}",
                cfg.weekly_cap_pct
            );
        }
    }

    if let Some(p) = &cfg.plates {
        let loaded = round_to_plates(w, &p.plates, p.bar_weight);
        if (loaded - w).abs() > WEIGHT_EPS {
            let _ = write!(reason, "; plates -> {loaded}");
        }
        w = loaded;
    }

    let start_weight = snap(w.max(0.0));
    tracing::debug!(exercise = %cfg.id, last_start_load, %decision, start_weight, cap_applied, "next start");
    NextStart {
        start_weight,
        reason,
        cap_applied,
    }
}
