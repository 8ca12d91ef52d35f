//! Session lifecycle state machine.
//!
//! `intro → workoutSelection → preWorkout → workoutOverview → stretching →
//! warmup → workingSet ⇄ rest → review → done`.
//!
//! Every command runs against a working copy of the committed state. The
//! copy becomes current only after all of its writes succeed; a failed
//! write leaves the machine untouched and parks the command for `Retry`.
//! Only `Retry` and `Abandon` are accepted while a command is parked.

use crate::adjust::{Prescription, Rating, advance_prescription, replay_prescription};
use crate::cache::LoadCache;
use crate::command::{Command, CommandKind};
use crate::config::{Catalog, ExerciseConfig, SessionSettings};
use crate::decision::compute_decision;
use crate::error::{EngineError, Result};
use crate::model::{ExerciseAttempt, ExerciseState, Position, Session, SetOutcome};
use crate::next_weight::compute_next_start;
use crate::plates::plate_breakdown;
use crate::rounding::snap;
use crate::state::StateTag;
use crate::store::SessionStore;
use crate::timer::{Countdown, TimerKind};
use crate::view::{ExerciseView, ResultView, View};
use crate::warmup::{Slot, WarmupPlan, generate_warmup};
use eyre::WrapErr;
use overload_traits::Clock;
use std::time::Duration;

/// Largest rep count accepted for a single set.
pub const MAX_REPS: u32 = 100;

#[derive(Debug, Clone, PartialEq)]
struct Current {
    tag: StateTag,
    session: Option<Session>,
    /// Derived from the attempt's start weight; never persisted.
    warmup: WarmupPlan,
}

impl Current {
    fn intro() -> Self {
        Self {
            tag: StateTag::Intro,
            session: None,
            warmup: WarmupPlan::default(),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        self.session
            .as_mut()
            .ok_or_else(|| EngineError::Contract("no session in progress".into()).into())
    }

    fn can_finish(&self) -> bool {
        self.session
            .as_ref()
            .and_then(Session::current_attempt)
            .is_some_and(|a| !a.is_finished() && !a.sets.is_empty())
    }
}

enum Write {
    ExerciseState { id: String, state: ExerciseState },
    Snapshot,
    Archive,
    ClearActive,
}

struct Step {
    writes: Vec<Write>,
    timer: Option<(TimerKind, Duration)>,
}

impl Step {
    fn none() -> Self {
        Self {
            writes: Vec::new(),
            timer: None,
        }
    }

    fn snapshot() -> Self {
        Self {
            writes: vec![Write::Snapshot],
            timer: None,
        }
    }

    fn with_timer(mut self, kind: TimerKind, secs: u32) -> Self {
        self.timer = Some((kind, Duration::from_secs(u64::from(secs))));
        self
    }
}

fn invalid(tag: StateTag, cmd: &Command) -> eyre::Report {
    EngineError::InvalidCommand {
        state: tag.to_string(),
        command: cmd.kind().as_str(),
    }
    .into()
}

fn contract(msg: impl Into<String>) -> eyre::Report {
    EngineError::Contract(msg.into()).into()
}

pub struct SessionMachine<S: SessionStore, C: Clock> {
    catalog: Catalog,
    settings: SessionSettings,
    store: S,
    clock: C,
    cache: LoadCache,
    current: Current,
    timer: Option<Countdown>,
    pending: Option<Command>,
}

impl<S: SessionStore, C: Clock> SessionMachine<S, C> {
    /// Fresh machine in `intro`, ignoring any persisted snapshot.
    pub fn new(catalog: Catalog, settings: SessionSettings, store: S, clock: C) -> Self {
        Self {
            catalog,
            settings,
            store,
            clock,
            cache: LoadCache::new(),
            current: Current::intro(),
            timer: None,
            pending: None,
        }
    }

    /// Machine restored from the store's active snapshot when it is fresh enough.
    ///
    /// Stale, inactive or unrestorable snapshots are cleared and the machine
    /// starts in `intro`. Load failures are logged and treated as "no snapshot".
    pub fn resume(catalog: Catalog, settings: SessionSettings, store: S, clock: C) -> Self {
        let mut machine = Self::new(catalog, settings, store, clock);
        let snapshot = match machine.store.load_active_session() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "loading active session failed; starting fresh");
                None
            }
        };
        let Some(session) = snapshot else {
            return machine;
        };

        let now = machine.clock.utc_now();
        let age = session.age(now);
        if !session.active || age >= machine.settings.stale_after() {
            tracing::info!(
                session = %session.id,
                age_hours = age.num_hours(),
                active = session.active,
                "discarding session snapshot"
            );
            machine.discard_snapshot();
            return machine;
        }

        let id = session.id.clone();
        match machine.restore(session) {
            Ok(()) => tracing::info!(session = %id, state = %machine.current.tag, "session resumed"),
            Err(e) => {
                tracing::warn!(session = %id, error = %e, "session snapshot could not be restored; discarding");
                machine.current = Current::intro();
                machine.timer = None;
                machine.discard_snapshot();
            }
        }
        machine
    }

    fn discard_snapshot(&mut self) {
        if let Err(e) = self.store.clear_active_session() {
            tracing::warn!(error = %e, "clearing discarded snapshot failed");
        }
    }

    fn restore(&mut self, mut session: Session) -> Result<()> {
        let tag = session.position.state;
        if !tag.in_session() {
            return Err(contract(format!("snapshot in state {tag} is not resumable")));
        }
        let workout = self
            .catalog
            .workout(&session.workout_id)
            .ok_or_else(|| contract(format!("unknown workout '{}'", session.workout_id)))?
            .clone();
        let now = self.clock.utc_now();
        let index = session.position.exercise_index;
        let mut current = Current {
            tag,
            session: None,
            warmup: WarmupPlan::default(),
        };

        if matches!(tag, StateTag::Warmup(_) | StateTag::WorkingSet | StateTag::Rest(_)) {
            let entry = workout
                .entries
                .get(index)
                .ok_or_else(|| contract(format!("exercise index {index} out of range")))?;
            let cfg = self.exercise(&entry.exercise_id)?.clone();
            if session.attempts.len() == index {
                let start = self.start_weight(&cfg);
                session
                    .attempts
                    .push(ExerciseAttempt::new(&session.id, index, &cfg.id, start, entry.sets));
                session.position.prescription = None;
                session.position.set_index = 1;
            }
            let attempt = session
                .attempts
                .get_mut(index)
                .ok_or_else(|| contract(format!("attempt log for exercise {index} is missing")))?;
            if session.position.prescription.is_none() && !attempt.is_finished() {
                let (rx, dropped) = replay_prescription(&cfg, attempt.start_weight, &attempt.sets);
                attempt.emergency_drop = dropped;
                session.position.prescription = Some(rx);
            }
            current.warmup = generate_warmup(cfg.equipment, attempt.start_weight, Slot::of_index(index), &cfg);
            match tag {
                StateTag::Warmup(step) if step as usize >= current.warmup.steps.len() => {
                    current.tag = StateTag::WorkingSet;
                }
                StateTag::Rest(_) => {
                    // exact remaining rest is not restored
                    let secs = self.rest_secs(&cfg);
                    current.tag = StateTag::Rest(secs);
                    session.position.timer_started_at = Some(now);
                    self.timer = Some(Countdown::start_secs(TimerKind::Rest, &self.clock, secs));
                }
                _ => {}
            }
        }

        if let StateTag::Stretching(_) = tag {
            let total_ms = i64::from(self.settings.stretch_seconds) * 1000;
            let elapsed_ms = session
                .position
                .timer_started_at
                .map(|t| (now - t).num_milliseconds().max(0))
                .unwrap_or(0);
            let remaining = u64::try_from((total_ms - elapsed_ms).max(0)).unwrap_or(0);
            let countdown = Countdown::start(TimerKind::Stretch, &self.clock, Duration::from_millis(remaining));
            current.tag = StateTag::Stretching(countdown.remaining_secs(self.clock.now()));
            self.timer = Some(countdown);
        }

        session.position.state = current.tag;
        current.session = Some(session);
        self.current = current;
        Ok(())
    }

    pub fn state(&self) -> StateTag {
        self.current.tag
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.session.as_ref()
    }

    pub fn warmup_plan(&self) -> &WarmupPlan {
        &self.current.warmup
    }

    pub fn pending(&self) -> Option<&Command> {
        self.pending.as_ref()
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.timer
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Force the next exercise start to reload progression state from the store.
    pub fn invalidate_cache(&mut self) {
        self.cache.invalidate();
    }

    fn exercise(&self, id: &str) -> Result<&ExerciseConfig> {
        self.catalog
            .exercise(id)
            .ok_or_else(|| EngineError::Config(format!("unknown exercise '{id}'")).into())
    }

    fn rest_secs(&self, cfg: &ExerciseConfig) -> u32 {
        cfg.rest_seconds.unwrap_or(self.settings.rest_seconds)
    }

    fn start_weight(&mut self, cfg: &ExerciseConfig) -> f64 {
        match self.cache.get(&self.store, &cfg.id) {
            Some(state) => state.next_start_load,
            None => cfg.initial_weight(),
        }
    }

    /// Refresh the live timer payload without persisting.
    pub fn tick(&mut self) -> View {
        self.sync_timer();
        self.view()
    }

    fn sync_timer(&mut self) {
        if let Some(t) = &self.timer {
            let secs = t.remaining_secs(self.clock.now());
            self.current.tag = self.current.tag.with_remaining(secs);
        }
    }

    /// Write the current snapshot again. No-op outside a session.
    pub fn persist(&mut self) -> Result<()> {
        if !self.current.tag.in_session() {
            return Ok(());
        }
        self.sync_timer();
        let mut next = self.current.clone();
        self.commit(&mut next, &[Write::Snapshot])?;
        self.current = next;
        Ok(())
    }

    pub fn apply(&mut self, cmd: Command) -> Result<View> {
        self.sync_timer();
        let cmd = match self.pending.take() {
            Some(parked) => match cmd {
                Command::Retry => {
                    self.pending = Some(parked.clone());
                    parked
                }
                // the parked command never created a session
                Command::Abandon if !self.current.tag.in_session() => return Ok(self.view()),
                Command::Abandon => {
                    self.pending = Some(parked);
                    Command::Abandon
                }
                _ => {
                    let kind = parked.kind();
                    self.pending = Some(parked);
                    return Err(EngineError::RetryRequired(kind.as_str()).into());
                }
            },
            None => match cmd {
                Command::Retry => return Err(contract("nothing to retry")),
                c => c,
            },
        };

        let from = self.current.tag;
        let mut next = self.current.clone();
        let step = self.transition(&mut next, &cmd)?;
        if let Err(e) = self.commit(&mut next, &step.writes) {
            tracing::error!(command = %cmd.kind(), error = %e, "save failed; transition not committed");
            if cmd.kind() != CommandKind::Abandon {
                self.pending = Some(cmd);
            }
            return Err(e);
        }

        self.current = next;
        self.pending = None;
        if let Some((kind, duration)) = step.timer {
            self.timer = Some(Countdown::start(kind, &self.clock, duration));
        }
        if !self.current.tag.is_timer() {
            self.timer = None;
        }
        tracing::info!(from = %from, to = %self.current.tag, command = %cmd.kind(), "transition");
        Ok(self.view())
    }

    fn commit(&mut self, next: &mut Current, writes: &[Write]) -> Result<()> {
        let now = self.clock.utc_now();
        if let Some(s) = next.session.as_mut() {
            s.position.state = next.tag;
            s.last_updated = now;
            if !next.tag.is_timer() {
                s.position.timer_started_at = None;
            }
        }
        let mut undo = Vec::new();
        for w in writes {
            if let Err(e) = self.write(next, w, &mut undo) {
                self.roll_back(undo);
                return Err(e);
            }
        }
        Ok(())
    }

    /// One store write. Exercise states that were overwritten are pushed to
    /// `undo` with their prior value so a later failure can put them back.
    fn write(&mut self, next: &mut Current, w: &Write, undo: &mut Vec<(String, Option<ExerciseState>)>) -> Result<()> {
        match w {
            Write::ExerciseState { id, state } => {
                let previous = match self.store.load_exercise_states() {
                    Ok(mut states) => Some(states.remove(id)),
                    Err(e) => {
                        tracing::warn!(exercise = %id, error = %e, "prior exercise state unreadable; it cannot be restored on failure");
                        None
                    }
                };
                self.store
                    .save_exercise_state(id, state)
                    .map_err(EngineError::from)
                    .wrap_err_with(|| format!("save exercise state for '{id}'"))?;
                self.cache.put(id, state.clone());
                if let Some(prev) = previous {
                    undo.push((id.clone(), prev));
                }
            }
            Write::Snapshot => {
                let session = next.session_mut()?;
                self.store
                    .save_session_snapshot(session)
                    .map_err(EngineError::from)
                    .wrap_err("save session snapshot")?;
            }
            Write::Archive => {
                let session = next.session_mut()?;
                self.store
                    .archive_session(session)
                    .map_err(EngineError::from)
                    .wrap_err("archive session")?;
            }
            Write::ClearActive => {
                self.store
                    .clear_active_session()
                    .map_err(EngineError::from)
                    .wrap_err("clear active session")?;
            }
        }
        Ok(())
    }

    /// Put exercise states written by a failed commit back to their prior values.
    fn roll_back(&mut self, undo: Vec<(String, Option<ExerciseState>)>) {
        for (id, prev) in undo.into_iter().rev() {
            let restored = match &prev {
                Some(s) => self.store.save_exercise_state(&id, s),
                None => self.store.remove_exercise_state(&id),
            };
            match restored {
                Ok(()) => self.cache.restore(&id, prev),
                Err(e) => {
                    tracing::error!(exercise = %id, error = %e, "restoring exercise state failed");
                    self.cache.invalidate();
                }
            }
        }
    }

    fn transition(&mut self, m: &mut Current, cmd: &Command) -> Result<Step> {
        use StateTag as T;
        let now = self.clock.utc_now();
        match (m.tag, cmd) {
            (tag, Command::Abandon) if tag.in_session() => {
                if let Some(s) = &m.session {
                    tracing::info!(session = %s.id, state = %tag, "session abandoned");
                }
                *m = Current::intro();
                Ok(Step {
                    writes: vec![Write::ClearActive],
                    timer: None,
                })
            }
            (T::Intro, Command::Begin) => {
                m.tag = T::WorkoutSelection;
                Ok(Step::none())
            }
            (T::Done, Command::Advance | Command::Begin) => {
                *m = Current::intro();
                Ok(Step::none())
            }
            (T::WorkoutSelection, Command::SelectWorkout(id)) => self.select_workout(m, id),
            (T::PreWorkout, Command::Advance) => {
                m.tag = T::WorkoutOverview;
                Ok(Step::snapshot())
            }
            (T::WorkoutOverview, Command::Advance) => {
                let secs = self.settings.stretch_seconds;
                if secs == 0 {
                    return self.open_exercise(m, 0);
                }
                m.tag = T::Stretching(secs);
                m.session_mut()?.position.timer_started_at = Some(now);
                Ok(Step::snapshot().with_timer(TimerKind::Stretch, secs))
            }
            (T::Stretching(_), Command::Advance | Command::SkipStretch) => self.open_exercise(m, 0),
            (T::Warmup(step), Command::Advance) => {
                let next = step as usize + 1;
                m.tag = if next < m.warmup.steps.len() {
                    T::Warmup(step + 1)
                } else {
                    T::WorkingSet
                };
                Ok(Step::snapshot())
            }
            (T::Warmup(_), Command::SkipWarmup) => {
                m.tag = T::WorkingSet;
                Ok(Step::snapshot())
            }
            (T::WorkingSet, Command::LogSet { reps, rating, weight }) => {
                self.log_set(m, *reps, *rating, *weight)
            }
            (T::WorkingSet | T::Rest(_), Command::FinishExercise) if m.can_finish() => self.finish_exercise(m),
            (T::Rest(remaining), Command::AdjustRest(delta)) => {
                let secs = (i64::from(remaining) + delta).clamp(0, i64::from(u32::MAX));
                let secs = u32::try_from(secs).unwrap_or(0);
                m.tag = T::Rest(secs);
                m.session_mut()?.position.timer_started_at = Some(now);
                Ok(Step::snapshot().with_timer(TimerKind::Rest, secs))
            }
            (T::Rest(_), Command::Advance) => {
                let session = m.session_mut()?;
                let finished = session.current_attempt().is_some_and(ExerciseAttempt::is_finished);
                if finished {
                    let next = session.position.exercise_index + 1;
                    self.open_exercise(m, next)
                } else {
                    m.tag = T::WorkingSet;
                    Ok(Step::snapshot())
                }
            }
            (T::Review, Command::Advance) => {
                let session = m.session_mut()?;
                session.active = false;
                tracing::info!(
                    session = %session.id,
                    sets = session.stats.sets_logged,
                    volume = session.stats.total_volume,
                    "session complete"
                );
                m.tag = T::Done;
                Ok(Step {
                    writes: vec![Write::Archive, Write::ClearActive],
                    timer: None,
                })
            }
            (tag, cmd) => Err(invalid(tag, cmd)),
        }
    }

    fn select_workout(&mut self, m: &mut Current, id: &str) -> Result<Step> {
        let workout = self
            .catalog
            .workout(id)
            .ok_or_else(|| contract(format!("unknown workout '{id}'")))?;
        if workout.entries.is_empty() {
            return Err(contract(format!("workout '{id}' has no exercises")));
        }
        match self.store.load_active_session() {
            Ok(Some(other)) if other.active => {
                return Err(contract(format!(
                    "session {} is already active; resume or abandon it first",
                    other.id
                )));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "checking for an active session failed"),
        }
        let session = Session::new(&workout.id, self.clock.utc_now());
        tracing::info!(session = %session.id, workout = %workout.id, "session created");
        m.session = Some(session);
        m.tag = StateTag::PreWorkout;
        m.warmup = WarmupPlan::default();
        Ok(Step::snapshot())
    }

    /// Start exercise `index` of the workout: new attempt, warm-up plan, first prescription.
    fn open_exercise(&mut self, m: &mut Current, index: usize) -> Result<Step> {
        let workout_id = m.session_mut()?.workout_id.clone();
        let entry = self
            .catalog
            .workout(&workout_id)
            .and_then(|w| w.entries.get(index))
            .cloned()
            .ok_or_else(|| contract(format!("workout '{workout_id}' has no exercise {index}")))?;
        let cfg = self.exercise(&entry.exercise_id)?.clone();
        let start = self.start_weight(&cfg);

        let session = m.session_mut()?;
        if session.attempts.len() != index {
            return Err(contract(format!("exercise {index} already started")));
        }
        session
            .attempts
            .push(ExerciseAttempt::new(&session.id, index, &cfg.id, start, entry.sets));
        session.position = Position {
            exercise_index: index,
            set_index: 1,
            state: session.position.state,
            prescription: Some(Prescription {
                weight: start,
                reps: cfg.rep_range.min,
            }),
            timer_started_at: None,
        };

        m.warmup = generate_warmup(cfg.equipment, start, Slot::of_index(index), &cfg);
        m.tag = if m.warmup.needs_warmup {
            StateTag::Warmup(0)
        } else {
            StateTag::WorkingSet
        };
        tracing::info!(
            exercise = %cfg.id,
            index,
            start_weight = start,
            warmup_steps = m.warmup.steps.len(),
            "exercise started"
        );
        Ok(Step::snapshot())
    }

    fn log_set(&mut self, m: &mut Current, reps: u32, rating: Rating, weight: Option<f64>) -> Result<Step> {
        if reps > MAX_REPS {
            return Err(contract(format!("reps {reps} outside [0, {MAX_REPS}]")));
        }
        let session = m.session_mut()?;
        let rx = session
            .position
            .prescription
            .ok_or_else(|| contract("no prescription in effect"))?;
        let weight = weight.unwrap_or(rx.weight);
        if !weight.is_finite() || weight < 0.0 {
            return Err(contract(format!("weight {weight} must be a non-negative number")));
        }
        let attempt = session
            .current_attempt_mut()
            .ok_or_else(|| contract("no exercise in progress"))?;
        let cfg = self.exercise(&attempt.exercise_id)?;

        let outcome = SetOutcome {
            set_index: u32::try_from(attempt.sets.len()).unwrap_or(u32::MAX).saturating_add(1),
            target_reps: rx.reps,
            target_weight: rx.weight,
            achieved_reps: reps,
            rating,
            actual_weight: snap(weight),
        };
        attempt.log(outcome)?;
        let (next_rx, dropped) = advance_prescription(cfg, rx, &attempt.sets, attempt.emergency_drop);
        if dropped && !attempt.emergency_drop {
            tracing::warn!(
                exercise = %attempt.exercise_id,
                weight = next_rx.weight,
                "first two sets red; emergency drop applied"
            );
        }
        attempt.emergency_drop = dropped;
        let all_logged = attempt.all_sets_logged();
        let logged = attempt.sets.len();
        let rest = self.rest_secs(cfg);
        tracing::info!(
            exercise = %attempt.exercise_id,
            set = outcome.set_index,
            reps,
            %rating,
            weight = outcome.actual_weight,
            next_weight = next_rx.weight,
            next_reps = next_rx.reps,
            "set logged"
        );

        session.position.prescription = Some(next_rx);
        session.position.set_index = u32::try_from(logged).unwrap_or(u32::MAX).saturating_add(1);
        session.recompute_stats();

        if all_logged {
            return self.finish_exercise(m);
        }
        m.tag = StateTag::Rest(rest);
        session_timer_start(m, self.clock.utc_now())?;
        Ok(Step::snapshot().with_timer(TimerKind::Rest, rest))
    }

    /// Decision, next start and `ExerciseState` for the current attempt;
    /// then rest before the next exercise, or review after the last one.
    fn finish_exercise(&mut self, m: &mut Current) -> Result<Step> {
        let now = self.clock.utc_now();
        let session = m.session_mut()?;
        let index = session.position.exercise_index;
        let exercise_count = self
            .catalog
            .workout(&session.workout_id)
            .map(|w| w.entries.len())
            .unwrap_or(0);
        let attempt = session
            .current_attempt_mut()
            .ok_or_else(|| contract("no exercise in progress"))?;
        if attempt.sets.is_empty() {
            return Err(contract("finishing an exercise requires at least one logged set"));
        }
        let cfg = self.exercise(&attempt.exercise_id)?;

        let decision = compute_decision(&attempt.sets, cfg.rep_range, attempt.planned_sets as usize);
        let recent = match self
            .store
            .recent_start_loads(&cfg.id, self.settings.recent_load_days, now)
        {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(exercise = %cfg.id, error = %e, "loading recent loads failed; cap uses last start");
                Vec::new()
            }
        };
        let next = compute_next_start(attempt.start_weight, decision, cfg, &recent);
        let state = ExerciseState {
            last_start_load: attempt.start_weight,
            next_start_load: next.start_weight,
            last_decision: decision,
            updated_at: now,
        };
        tracing::info!(
            exercise = %cfg.id,
            %decision,
            last_start = attempt.start_weight,
            next_start = next.start_weight,
            cap_applied = next.cap_applied,
            "exercise finished"
        );
        let rest = self.rest_secs(cfg);
        let id = attempt.exercise_id.clone();
        attempt.finish(decision, next)?;

        let writes = vec![Write::ExerciseState { id, state }, Write::Snapshot];
        if index + 1 < exercise_count {
            m.tag = StateTag::Rest(rest);
            session_timer_start(m, now)?;
            Ok(Step { writes, timer: None }.with_timer(TimerKind::Rest, rest))
        } else {
            m.tag = StateTag::Review;
            Ok(Step { writes, timer: None })
        }
    }

    pub fn available_commands(&self) -> Vec<CommandKind> {
        use CommandKind as K;
        use StateTag as T;
        if self.pending.is_some() {
            return vec![K::Retry, K::Abandon];
        }
        let tag = self.current.tag;
        let mut v = match tag {
            T::Intro => vec![K::Begin],
            T::WorkoutSelection => vec![K::SelectWorkout],
            T::PreWorkout | T::WorkoutOverview | T::Review => vec![K::Advance],
            T::Stretching(_) => vec![K::Advance, K::SkipStretch],
            T::Warmup(_) => vec![K::Advance, K::SkipWarmup],
            T::WorkingSet => vec![K::LogSet],
            T::Rest(_) => vec![K::Advance, K::AdjustRest],
            T::Done => vec![K::Advance, K::Begin],
        };
        if matches!(tag, T::WorkingSet | T::Rest(_)) && self.current.can_finish() {
            v.push(K::FinishExercise);
        }
        if tag.in_session() {
            v.push(K::Abandon);
        }
        v
    }

    pub fn view(&self) -> View {
        let m = &self.current;
        let session = m.session.as_ref();
        let attempt = session.and_then(Session::current_attempt);
        let cfg = attempt.and_then(|a| self.catalog.exercise(&a.exercise_id));
        let exercise_count = session
            .and_then(|s| self.catalog.workout(&s.workout_id))
            .map(|w| w.entries.len())
            .unwrap_or(0);

        let exercise = match (session, attempt, cfg) {
            (Some(s), Some(a), Some(c)) => Some(ExerciseView {
                id: c.id.clone(),
                name: c.name.clone(),
                index: s.position.exercise_index,
                of: exercise_count,
                set_index: s.position.set_index,
                planned_sets: a.planned_sets,
                sets_logged: a.sets.len(),
                start_weight: a.start_weight,
            }),
            _ => None,
        };
        let prescription = match (session, attempt) {
            (Some(s), Some(a)) if !a.is_finished() => s.position.prescription,
            _ => None,
        };
        let warmup = match m.tag {
            StateTag::Warmup(step) => m.warmup.steps.get(step as usize).copied(),
            _ => None,
        };
        let plate_target = warmup.map(|w| w.weight).or(prescription.map(|p| p.weight));
        let plates = cfg
            .and_then(|c| c.plates.as_ref())
            .zip(plate_target)
            .map(|(p, w)| plate_breakdown(w, &p.plates, p.bar_weight));
        let last_result = session.and_then(Session::last_finished).and_then(|a| {
            Some(ResultView {
                exercise_id: a.exercise_id.clone(),
                decision: a.decision?,
                next_start: a.next_start.clone()?,
            })
        });

        View {
            state: m.tag,
            session_id: session.map(|s| s.id.clone()),
            workout_id: session.map(|s| s.workout_id.clone()),
            exercise,
            prescription,
            plates,
            warmup,
            remaining_seconds: m.tag.is_timer().then(|| m.tag.payload()).flatten(),
            last_result,
            stats: session.map(|s| s.stats),
            pending: self.pending.as_ref().map(Command::kind),
            commands: self.available_commands(),
        }
    }
}

fn session_timer_start(m: &mut Current, now: chrono::DateTime<chrono::Utc>) -> Result<()> {
    m.session_mut()?.position.timer_started_at = Some(now);
    Ok(())
}
