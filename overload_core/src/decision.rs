//! End-of-exercise classification.

use crate::adjust::Rating;
use crate::config::RepRange;
use crate::model::SetOutcome;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    EscalateDouble,
    EscalateSingle,
    Hold,
    Reduce,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::EscalateDouble => "escalate-double",
            Decision::EscalateSingle => "escalate-single",
            Decision::Hold => "hold",
            Decision::Reduce => "reduce",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "escalate-double" => Ok(Decision::EscalateDouble),
            "escalate-single" => Ok(Decision::EscalateSingle),
            "hold" => Ok(Decision::Hold),
            "reduce" => Ok(Decision::Reduce),
            other => Err(format!(
                "unknown decision '{other}' (expected escalate-double|escalate-single|hold|reduce)"
            )),
        }
    }
}

/// Counters the decision is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub red: usize,
    pub hit_top: usize,
    pub meet: usize,
    pub easy_top: usize,
    pub all_at_max: bool,
}

impl Tally {
    pub fn from_outcomes(outcomes: &[SetOutcome], rep_range: RepRange) -> Self {
        let mut t = Tally {
            all_at_max: true,
            ..Tally::default()
        };
        for o in outcomes {
            let at_max = o.achieved_reps >= rep_range.max;
            t.red += usize::from(o.rating.is_red());
            t.hit_top += usize::from(at_max && o.rating != Rating::VeryHard);
            t.meet += usize::from(o.achieved_reps >= rep_range.min && o.rating != Rating::Fail);
            t.easy_top += usize::from(at_max && o.rating == Rating::Easy);
            t.all_at_max &= at_max;
        }
        t
    }
}

/// Classify a finished exercise. Exactly one branch fires for any input.
///
/// `total_sets` is the planned set count; thresholds are evaluated against
/// it, not against the number of sets actually logged.
pub fn compute_decision(outcomes: &[SetOutcome], rep_range: RepRange, total_sets: usize) -> Decision {
    let t = Tally::from_outcomes(outcomes, rep_range);
    let decision = if t.all_at_max && (t.easy_top as f64) >= (total_sets as f64) / 2.0 {
        Decision::EscalateDouble
    } else if t.meet == total_sets && t.red == 0 && t.hit_top + 1 >= total_sets {
        Decision::EscalateSingle
    } else if t.red >= 2 || t.meet + 1 < total_sets {
        Decision::Reduce
    } else {
        Decision::Hold
    };
    tracing::debug!(?t, total_sets, %decision, "end-of-exercise decision");
    decision
}
