use crate::adjust::Rating;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input from the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Begin,
    SelectWorkout(String),
    Advance,
    SkipStretch,
    SkipWarmup,
    LogSet {
        reps: u32,
        rating: Rating,
        /// Weight actually used; defaults to the prescription.
        weight: Option<f64>,
    },
    /// Add (or with a negative value, remove) seconds from the running rest.
    AdjustRest(i64),
    FinishExercise,
    Abandon,
    /// Re-apply the command whose save failed.
    Retry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    Begin,
    SelectWorkout,
    Advance,
    SkipStretch,
    SkipWarmup,
    LogSet,
    AdjustRest,
    FinishExercise,
    Abandon,
    Retry,
}

impl CommandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Begin => "begin",
            CommandKind::SelectWorkout => "select-workout",
            CommandKind::Advance => "advance",
            CommandKind::SkipStretch => "skip-stretch",
            CommandKind::SkipWarmup => "skip-warmup",
            CommandKind::LogSet => "log-set",
            CommandKind::AdjustRest => "adjust-rest",
            CommandKind::FinishExercise => "finish-exercise",
            CommandKind::Abandon => "abandon",
            CommandKind::Retry => "retry",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Begin => CommandKind::Begin,
            Command::SelectWorkout(_) => CommandKind::SelectWorkout,
            Command::Advance => CommandKind::Advance,
            Command::SkipStretch => CommandKind::SkipStretch,
            Command::SkipWarmup => CommandKind::SkipWarmup,
            Command::LogSet { .. } => CommandKind::LogSet,
            Command::AdjustRest(_) => CommandKind::AdjustRest,
            Command::FinishExercise => CommandKind::FinishExercise,
            Command::Abandon => CommandKind::Abandon,
            Command::Retry => CommandKind::Retry,
        }
    }
}
