//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use overload_core::{Decision, Rating};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "overload", version, about = "Progressive-overload training log")]
pub struct Cli {
    /// Path to the catalog TOML
    #[arg(long, value_name = "FILE", default_value = "etc/overload.toml")]
    pub config: PathBuf,

    /// Override `storage.data_dir` from the catalog
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print views and errors as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the catalog and print a summary
    Check,
    /// Show the current session, if any
    Status,
    /// Begin a new session of the given workout
    Start {
        /// Workout id from the catalog
        workout: String,
    },
    /// Move to the next step (overview, stretch, warm-up step, set, exercise)
    Advance,
    /// Cut the stretch countdown short
    SkipStretch,
    /// Skip the remaining warm-up steps
    SkipWarmup,
    /// Log the working set just completed
    Log {
        /// Repetitions achieved
        #[arg(long)]
        reps: u32,
        /// How the set felt: fail, very-hard, hard or easy
        #[arg(long)]
        rating: Rating,
        /// Weight actually used, when it differs from the prescription
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Lengthen or shorten the running rest
    Rest {
        /// Seconds to add (negative to remove)
        #[arg(long, allow_hyphen_values = true)]
        adjust: i64,
    },
    /// End the current exercise before all planned sets are logged
    FinishExercise,
    /// Discard the session in progress
    Abandon,
    /// Block until the running stretch or rest countdown reaches zero
    Wait,
    /// Drive a session interactively, one command per stdin line
    Session,
    /// Load a target weight with the exercise's plates
    Plates {
        #[arg(long)]
        exercise: String,
        #[arg(long)]
        target: f64,
    },
    /// Warm-up ramp for a working weight
    Warmup {
        #[arg(long)]
        exercise: String,
        #[arg(long)]
        weight: f64,
        /// Ramp for an exercise that is not first in the workout
        #[arg(long, action = ArgAction::SetTrue)]
        later: bool,
    },
    /// Next starting load after a finished exercise
    Next {
        #[arg(long)]
        exercise: String,
        /// Starting load of the finished occurrence
        #[arg(long)]
        last: f64,
        /// escalate-double, escalate-single, hold or reduce
        #[arg(long)]
        decision: Decision,
    },
}
