//! Text rendering of machine views and engine results.

use overload_core::{NextStart, StateTag, View, WarmupPlan};
use std::fmt::Write as _;

pub fn plates_text(plates: &[f64]) -> String {
    if plates.is_empty() {
        return "bar only".to_string();
    }
    plates.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" + ")
}

pub fn view_text(v: &View) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "state: {}", v.state);
    if let (Some(id), Some(workout)) = (&v.session_id, &v.workout_id) {
        let _ = writeln!(out, "session: {id} ({workout})");
    }
    if let Some(ex) = &v.exercise {
        let _ = writeln!(
            out,
            "exercise {}/{}: {} - set {} of {}, start {}",
            ex.index + 1,
            ex.of,
            ex.name,
            ex.set_index.min(ex.planned_sets),
            ex.planned_sets,
            ex.start_weight
        );
    }
    if let Some(w) = &v.warmup {
        let _ = writeln!(out, "warm-up {}: {} x {}", w.step_index + 1, w.weight, w.reps);
    } else if let Some(rx) = &v.prescription {
        let _ = writeln!(out, "next set: {} x {}", rx.weight, rx.reps);
    }
    if let Some(plates) = &v.plates {
        let _ = writeln!(out, "plates per side: {}", plates_text(plates));
    }
    match (v.state, v.remaining_seconds) {
        (StateTag::Rest(_), Some(s)) => {
            let _ = writeln!(out, "rest: {s}s");
        }
        (StateTag::Stretching(_), Some(s)) => {
            let _ = writeln!(out, "stretch: {s}s");
        }
        _ => {}
    }
    if let Some(r) = &v.last_result {
        let _ = writeln!(
            out,
            "last exercise: {} {} -> next start {}",
            r.exercise_id, r.decision, r.next_start.start_weight
        );
    }
    if let Some(stats) = &v.stats {
        let _ = writeln!(out, "volume: {} over {} sets", stats.total_volume, stats.sets_logged);
    }
    if let Some(p) = &v.pending {
        let _ = writeln!(out, "pending save: {p}");
    }
    let commands: Vec<&str> = v.commands.iter().map(|c| c.as_str()).collect();
    let _ = write!(out, "commands: {}", commands.join(", "));
    out
}

pub fn warmup_text(plan: &WarmupPlan) -> String {
    if !plan.needs_warmup {
        return "no warm-up".to_string();
    }
    plan.steps
        .iter()
        .map(|s| format!("{}: {} x {}", s.step_index + 1, s.weight, s.reps))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn next_text(n: &NextStart) -> String {
    let cap = if n.cap_applied { " (weekly cap)" } else { "" };
    format!("next start: {}{cap}\n{}", n.start_weight, n.reason)
}
