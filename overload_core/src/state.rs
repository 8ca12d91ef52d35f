//! Named session states and their compact `name` / `name:payload` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum StateTag {
    Intro,
    WorkoutSelection,
    PreWorkout,
    WorkoutOverview,
    /// Remaining seconds.
    Stretching(u32),
    /// Current step index.
    Warmup(u32),
    WorkingSet,
    /// Remaining seconds.
    Rest(u32),
    Review,
    Done,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateTagError {
    #[error("unknown state '{0}'")]
    Unknown(String),
    #[error("state '{0}' requires a numeric payload")]
    MissingPayload(String),
    #[error("state '{0}' does not take a payload")]
    UnexpectedPayload(String),
    #[error("invalid payload in '{0}'")]
    BadPayload(String),
}

impl StateTag {
    pub fn name(&self) -> &'static str {
        match self {
            StateTag::Intro => "intro",
            StateTag::WorkoutSelection => "workoutSelection",
            StateTag::PreWorkout => "preWorkout",
            StateTag::WorkoutOverview => "workoutOverview",
            StateTag::Stretching(_) => "stretching",
            StateTag::Warmup(_) => "warmup",
            StateTag::WorkingSet => "workingSet",
            StateTag::Rest(_) => "rest",
            StateTag::Review => "review",
            StateTag::Done => "done",
        }
    }

    pub fn payload(&self) -> Option<u32> {
        match *self {
            StateTag::Stretching(n) | StateTag::Warmup(n) | StateTag::Rest(n) => Some(n),
            _ => None,
        }
    }

    /// States that belong to a started session.
    pub fn in_session(&self) -> bool {
        !matches!(
            self,
            StateTag::Intro | StateTag::WorkoutSelection | StateTag::Done
        )
    }

    pub fn is_timer(&self) -> bool {
        matches!(self, StateTag::Stretching(_) | StateTag::Rest(_))
    }

    /// Same state with a new timer payload; non-timer states are unchanged.
    pub fn with_remaining(self, secs: u32) -> Self {
        match self {
            StateTag::Stretching(_) => StateTag::Stretching(secs),
            StateTag::Rest(_) => StateTag::Rest(secs),
            other => other,
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Some(n) => write!(f, "{}:{n}", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

impl FromStr for StateTag {
    type Err = StateTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, payload) = match s.split_once(':') {
            Some((n, p)) => (
                n,
                Some(
                    p.parse::<u32>()
                        .map_err(|_| StateTagError::BadPayload(s.to_string()))?,
                ),
            ),
            None => (s, None),
        };
        let unit = |tag: StateTag| match payload {
            None => Ok(tag),
            Some(_) => Err(StateTagError::UnexpectedPayload(s.to_string())),
        };
        let with = |make: fn(u32) -> StateTag| {
            payload
                .map(make)
                .ok_or_else(|| StateTagError::MissingPayload(s.to_string()))
        };
        match name {
            "intro" => unit(StateTag::Intro),
            "workoutSelection" => unit(StateTag::WorkoutSelection),
            "preWorkout" => unit(StateTag::PreWorkout),
            "workoutOverview" => unit(StateTag::WorkoutOverview),
            "stretching" => with(StateTag::Stretching),
            "warmup" => with(StateTag::Warmup),
            "workingSet" => unit(StateTag::WorkingSet),
            "rest" => with(StateTag::Rest),
            "review" => unit(StateTag::Review),
            "done" => unit(StateTag::Done),
            _ => Err(StateTagError::Unknown(s.to_string())),
        }
    }
}

impl From<StateTag> for String {
    fn from(tag: StateTag) -> Self {
        tag.to_string()
    }
}

impl TryFrom<String> for StateTag {
    type Error = StateTagError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
