//! Render-ready snapshot of the machine for presenters.

use crate::adjust::Prescription;
use crate::command::CommandKind;
use crate::decision::Decision;
use crate::model::SessionStats;
use crate::next_weight::NextStart;
use crate::state::StateTag;
use crate::warmup::WarmupStep;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExerciseView {
    pub id: String,
    pub name: String,
    /// 0-based position in the workout.
    pub index: usize,
    pub of: usize,
    /// 1-based index of the upcoming set.
    pub set_index: u32,
    pub planned_sets: u32,
    pub sets_logged: usize,
    pub start_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    pub exercise_id: String,
    pub decision: Decision,
    pub next_start: NextStart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub state: StateTag,
    pub session_id: Option<String>,
    pub workout_id: Option<String>,
    pub exercise: Option<ExerciseView>,
    pub prescription: Option<Prescription>,
    /// Per-side plates for the prescribed (or warm-up) weight.
    pub plates: Option<Vec<f64>>,
    pub warmup: Option<WarmupStep>,
    pub remaining_seconds: Option<u32>,
    pub last_result: Option<ResultView>,
    pub stats: Option<SessionStats>,
    /// Command whose save failed and awaits `retry`.
    pub pending: Option<CommandKind>,
    pub commands: Vec<CommandKind>,
}
