//! Micro-adjustment: the prescription for the next set of the same exercise.

use crate::bad_session::should_drop_mid_exercise;
use crate::config::{ExerciseConfig, RepRange};
use crate::model::SetOutcome;
use crate::rounding::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subjective difficulty of a completed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Fail,
    VeryHard,
    Hard,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::Fail, Rating::VeryHard, Rating::Hard, Rating::Easy];

    /// Fail or very-hard.
    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self, Rating::Fail | Rating::VeryHard)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Fail => "fail",
            Rating::VeryHard => "very-hard",
            Rating::Hard => "hard",
            Rating::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(Rating::Fail),
            "very-hard" | "very_hard" | "veryhard" => Ok(Rating::VeryHard),
            "hard" => Ok(Rating::Hard),
            "easy" => Ok(Rating::Easy),
            other => Err(format!(
                "unknown rating '{other}' (expected fail|very-hard|hard|easy)"
            )),
        }
    }
}

/// Weight and target reps for the next set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub weight: f64,
    pub reps: u32,
}

fn drop_by(current: f64, step: f64, rounding: f64) -> f64 {
    round_to((current - step).max(0.0), rounding).max(0.0)
}

/// Next-set prescription from the set just completed.
///
/// Total for valid inputs: weights never go negative and reps stay inside
/// `rep_range`.
pub fn micro_adjust(
    current_weight: f64,
    achieved_reps: u32,
    rep_range: RepRange,
    rating: Rating,
    base_increment: f64,
    micro_step: Option<f64>,
    rounding: f64,
) -> Prescription {
    let hold = |reps: u32| Prescription {
        weight: round_to(current_weight, rounding).max(0.0),
        reps: rep_range.clamp(reps),
    };
    let below_min = achieved_reps < rep_range.min;
    match rating {
        Rating::Fail => Prescription {
            weight: drop_by(current_weight, base_increment, rounding),
            reps: rep_range.min,
        },
        Rating::VeryHard if below_min => Prescription {
            weight: drop_by(current_weight, base_increment, rounding),
            reps: rep_range.min,
        },
        Rating::Hard if below_min => Prescription {
            weight: drop_by(current_weight, micro_step.unwrap_or(base_increment), rounding),
            reps: rep_range.min,
        },
        Rating::Easy if achieved_reps >= rep_range.max => match micro_step {
            Some(step) => Prescription {
                weight: round_to(current_weight + step, rounding).max(0.0),
                reps: rep_range.max,
            },
            None => hold(achieved_reps),
        },
        Rating::VeryHard | Rating::Hard | Rating::Easy => hold(achieved_reps),
    }
}

/// [`micro_adjust`] with the parameters taken from an exercise config.
pub fn micro_adjust_for(cfg: &ExerciseConfig, current_weight: f64, achieved_reps: u32, rating: Rating) -> Prescription {
    micro_adjust(
        current_weight,
        achieved_reps,
        cfg.rep_range,
        rating,
        cfg.base_increment,
        cfg.micro_step,
        cfg.rounding,
    )
}

/// The fail-path drop applied when the session is going badly.
pub fn emergency_drop(cfg: &ExerciseConfig, current_weight: f64) -> Prescription {
    micro_adjust_for(cfg, current_weight, 0, Rating::Fail)
}

/// Prescription after `outcomes.last()` was logged.
///
/// Returns the new prescription and whether the occurrence is now frozen
/// by an emergency drop. Once frozen the prescription no longer moves.
pub fn advance_prescription(
    cfg: &ExerciseConfig,
    current: Prescription,
    outcomes: &[SetOutcome],
    dropped: bool,
) -> (Prescription, bool) {
    let Some(last) = outcomes.last() else {
        return (current, dropped);
    };
    if dropped {
        return (current, true);
    }
    if outcomes.len() == 2 && should_drop_mid_exercise(outcomes) {
        return (emergency_drop(cfg, last.actual_weight), true);
    }
    (
        micro_adjust_for(cfg, last.actual_weight, last.achieved_reps, last.rating),
        false,
    )
}

/// Rebuild the prescription in effect by replaying a set log from `start_weight`.
pub fn replay_prescription(cfg: &ExerciseConfig, start_weight: f64, outcomes: &[SetOutcome]) -> (Prescription, bool) {
    let mut rx = Prescription {
        weight: start_weight,
        reps: cfg.rep_range.min,
    };
    let mut dropped = false;
    for n in 1..=outcomes.len() {
        (rx, dropped) = advance_prescription(cfg, rx, &outcomes[..n], dropped);
    }
    (rx, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_parses_aliases() {
        assert_eq!("Very_Hard".parse::<Rating>().unwrap(), Rating::VeryHard);
        assert_eq!("easy".parse::<Rating>().unwrap(), Rating::Easy);
        assert!("meh".parse::<Rating>().is_err());
    }

    #[test]
    fn rating_serde_is_kebab_case() {
        assert_eq!(serde_json::to_string(&Rating::VeryHard).unwrap(), "\"very-hard\"");
    }

    #[test]
    fn fail_floors_at_zero() {
        let rx = micro_adjust(2.5, 3, RepRange::new(5, 8), Rating::Fail, 5.0, None, 2.5);
        assert_eq!(rx, Prescription { weight: 0.0, reps: 5 });
    }
}
