//! Subcommand execution against the catalog and the data directory.

use crate::cli::{Cli, Commands};
use crate::render;
use crate::session;
use eyre::{Result, WrapErr};
use overload_config::Config;
use overload_core::timer::{TICK_PERIOD, Ticker};
use overload_core::warmup::Slot;
use overload_core::{
    Catalog, Command, EngineError, ExerciseConfig, FileStore, SessionMachine, SessionSettings, SessionStore, View,
    compute_next_start, generate_warmup, plate_breakdown, round_to_plates,
};
use overload_traits::MonotonicClock;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub type Machine = SessionMachine<FileStore, MonotonicClock>;

/// What a subcommand produced, rendered by `main` as text or JSON.
pub enum Output {
    View(View),
    Report { text: String, json: serde_json::Value },
    /// Already written incrementally (interactive session).
    Streamed,
}

/// Relative paths in the catalog are taken from the catalog's directory.
pub fn resolve(base: &Path, p: &str) -> PathBuf {
    let path = Path::new(p);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

pub fn config_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

pub struct App {
    pub catalog: Catalog,
    pub settings: SessionSettings,
    pub data_dir: PathBuf,
    plate_sets: usize,
}

impl App {
    pub fn new(cfg: &Config, config_path: &Path, data_dir: Option<&Path>) -> Result<Self> {
        let catalog = Catalog::try_from(cfg)?;
        let data_dir = match data_dir {
            Some(d) => d.to_path_buf(),
            None => resolve(config_dir(config_path), &cfg.storage.data_dir),
        };
        Ok(Self {
            catalog,
            settings: (&cfg.session).into(),
            data_dir,
            plate_sets: cfg.plate_sets.len(),
        })
    }

    pub fn store(&self) -> Result<FileStore> {
        FileStore::open(&self.data_dir).wrap_err_with(|| format!("open data directory {:?}", self.data_dir))
    }

    pub fn machine(&self) -> Result<Machine> {
        Ok(SessionMachine::resume(
            self.catalog.clone(),
            self.settings,
            self.store()?,
            MonotonicClock::new(),
        ))
    }

    fn exercise(&self, id: &str) -> Result<&ExerciseConfig> {
        self.catalog
            .exercise(id)
            .ok_or_else(|| EngineError::Contract(format!("unknown exercise '{id}'")).into())
    }
}

/// The machine command a one-shot subcommand maps to, if it is one.
fn machine_command(cmd: &Commands) -> Option<Command> {
    Some(match cmd {
        Commands::Advance => Command::Advance,
        Commands::SkipStretch => Command::SkipStretch,
        Commands::SkipWarmup => Command::SkipWarmup,
        Commands::Log { reps, rating, weight } => Command::LogSet {
            reps: *reps,
            rating: *rating,
            weight: *weight,
        },
        Commands::Rest { adjust } => Command::AdjustRest(*adjust),
        Commands::FinishExercise => Command::FinishExercise,
        Commands::Abandon => Command::Abandon,
        _ => return None,
    })
}

pub fn run(cli: &Cli, cfg: &Config) -> Result<Output> {
    let app = App::new(cfg, &cli.config, cli.data_dir.as_deref())?;
    match &cli.cmd {
        Commands::Check => Ok(check(&app)),
        Commands::Status => Ok(Output::View(app.machine()?.tick())),
        Commands::Start { workout } => {
            let mut m = app.machine()?;
            m.apply(Command::Begin)?;
            Ok(Output::View(m.apply(Command::SelectWorkout(workout.clone()))?))
        }
        Commands::Wait => wait(&app, cli.json),
        Commands::Session => {
            let mut m = app.machine()?;
            let stdin = std::io::stdin();
            session::run(&mut m, stdin.lock(), std::io::stdout(), cli.json)?;
            Ok(Output::Streamed)
        }
        Commands::Plates { exercise, target } => plates(&app, exercise, *target),
        Commands::Warmup { exercise, weight, later } => {
            let cfg = app.exercise(exercise)?;
            let slot = if *later { Slot::Later } else { Slot::First };
            let plan = generate_warmup(cfg.equipment, *weight, slot, cfg);
            Ok(Output::Report {
                text: render::warmup_text(&plan),
                json: serde_json::to_value(&plan)?,
            })
        }
        Commands::Next { exercise, last, decision } => {
            let cfg = app.exercise(exercise)?;
            let recent = match app
                .store()
                .and_then(|s| Ok(s.recent_start_loads(&cfg.id, app.settings.recent_load_days, chrono::Utc::now())?))
            {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "recent loads unavailable; cap uses last start");
                    Vec::new()
                }
            };
            let next = compute_next_start(*last, *decision, cfg, &recent);
            Ok(Output::Report {
                text: render::next_text(&next),
                json: serde_json::to_value(&next)?,
            })
        }
        other => {
            let cmd = machine_command(other).ok_or_else(|| eyre::eyre!("{other:?} is not a session command"))?;
            let mut m = app.machine()?;
            Ok(Output::View(m.apply(cmd)?))
        }
    }
}

fn check(app: &App) -> Output {
    let exercises = app.catalog.exercises().count();
    let workouts: Vec<&str> = app.catalog.workouts().iter().map(|w| w.id.as_str()).collect();
    Output::Report {
        text: format!(
            "catalog ok: {exercises} exercises, {} plate sets, workouts: {}",
            app.plate_sets,
            workouts.join(", ")
        ),
        json: json!({
            "ok": true,
            "exercises": exercises,
            "plate_sets": app.plate_sets,
            "workouts": workouts,
        }),
    }
}

fn plates(app: &App, exercise: &str, target: f64) -> Result<Output> {
    let cfg = app.exercise(exercise)?;
    let Some(set) = &cfg.plates else {
        let loaded = cfg.loadable(target);
        return Ok(Output::Report {
            text: format!("{loaded} (no plate set; rounded to {})", cfg.rounding),
            json: json!({ "exercise": cfg.id, "target": target, "loaded": loaded }),
        });
    };
    let loaded = round_to_plates(target, &set.plates, set.bar_weight);
    let per_side = plate_breakdown(target, &set.plates, set.bar_weight);
    Ok(Output::Report {
        text: format!(
            "{loaded} = bar {} + 2 x ({})",
            set.bar_weight,
            render::plates_text(&per_side)
        ),
        json: json!({
            "exercise": cfg.id,
            "target": target,
            "loaded": loaded,
            "bar": set.bar_weight,
            "per_side": per_side,
        }),
    })
}

fn wait(app: &App, json: bool) -> Result<Output> {
    let mut m = app.machine()?;
    let Some(countdown) = m.countdown() else {
        tracing::info!(state = %m.state(), "no countdown running");
        return Ok(Output::View(m.tick()));
    };

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)).wrap_err("install Ctrl-C handler")?;

    let ticker = Ticker::spawn(countdown, TICK_PERIOD, MonotonicClock::new());
    let mut shown = None;
    while !stop.load(Ordering::Relaxed) {
        // None: the ticker finished or stalled
        let Some(remaining) = ticker.recv_timeout(TICK_PERIOD * 4) else {
            break;
        };
        let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
        if !json && shown != Some(secs) {
            eprint!("\r{secs:>5}s ");
            shown = Some(secs);
        }
        if remaining.is_zero() {
            break;
        }
    }
    drop(ticker);
    if !json {
        eprintln!();
    }
    if stop.load(Ordering::Relaxed) {
        tracing::info!("wait interrupted; session snapshot is unchanged");
    }
    Ok(Output::View(m.tick()))
}
