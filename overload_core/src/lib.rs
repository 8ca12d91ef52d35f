#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Progressive-overload engine and session state machine.
//!
//! The engine functions are pure and deterministic; everything with side
//! effects goes through `store::SessionStore` and `overload_traits::Clock`.
//!
//! ## Architecture
//!
//! - **Rounding / plates**: granularity rounding and greedy plate loading
//! - **Warm-up**: equipment-aware ramps (`warmup`)
//! - **Micro-adjust**: next-set prescription (`adjust`), bad-session drop (`bad_session`)
//! - **Decision**: end-of-exercise classification (`decision`)
//! - **Next start**: next-session starting load with weekly cap (`next_weight`)
//! - **Session machine**: transactional lifecycle with resume (`machine`)
//! - **Storage**: `SessionStore` seam, in-memory and JSON-file stores

pub mod adjust;
pub mod bad_session;
pub mod cache;
pub mod command;
pub mod config;
pub mod conversions;
pub mod decision;
pub mod error;
pub mod file_store;
pub mod machine;
pub mod memory;
pub mod model;
pub mod next_weight;
pub mod plates;
pub mod rounding;
pub mod state;
pub mod store;
pub mod timer;
pub mod view;
pub mod warmup;

pub use adjust::{Prescription, Rating, micro_adjust};
pub use command::{Command, CommandKind};
pub use config::{Catalog, Equipment, ExerciseConfig, PlateSet, RepRange, SessionSettings, WarmupMode};
pub use decision::{Decision, compute_decision};
pub use error::{EngineError, Result, StoreError};
pub use file_store::FileStore;
pub use machine::SessionMachine;
pub use memory::MemoryStore;
pub use model::{ExerciseAttempt, ExerciseState, Session, SetOutcome};
pub use next_weight::{NextStart, compute_next_start};
pub use plates::{plate_breakdown, round_to_plates};
pub use rounding::round_to;
pub use state::StateTag;
pub use store::SessionStore;
pub use view::View;
pub use warmup::{WarmupPlan, WarmupStep, generate_warmup};
