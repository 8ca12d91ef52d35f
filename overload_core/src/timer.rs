//! Stretch and rest countdowns.
//!
//! A `Countdown` stores an absolute start and a duration; remaining time is
//! always recomputed from the clock, so a suspended process catches up on
//! resume instead of drifting.
//!
//! A `Ticker` owns a background thread that publishes the remaining time
//! through a bounded channel and is shut down and joined on drop.
use crossbeam_channel as xch;
use overload_traits::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub const TICK_PERIOD: Duration = Duration::from_millis(250);

/// Upper bound on how long the final zero tick waits for a slow consumer.
const FINAL_TICK_WAIT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Stretch,
    Rest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub kind: TimerKind,
    started: Instant,
    duration: Duration,
}

impl Countdown {
    pub fn start<C: Clock + ?Sized>(kind: TimerKind, clock: &C, duration: Duration) -> Self {
        Self {
            kind,
            started: clock.now(),
            duration,
        }
    }

    pub fn start_secs<C: Clock + ?Sized>(kind: TimerKind, clock: &C, secs: u32) -> Self {
        Self::start(kind, clock, Duration::from_secs(u64::from(secs)))
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.duration
            .saturating_sub(now.saturating_duration_since(self.started))
    }

    /// Remaining whole seconds, rounded up so a running timer never shows 0.
    pub fn remaining_secs(&self, now: Instant) -> u32 {
        let ms = self.remaining(now).as_millis();
        u32::try_from(ms.div_ceil(1000)).unwrap_or(u32::MAX)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}

pub struct Ticker {
    rx: xch::Receiver<Duration>,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn<C: Clock + Send + Sync + 'static>(countdown: Countdown, period: Duration, clock: C) -> Self {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("Ticker thread received shutdown signal");
                    break;
                }
                let remaining = countdown.remaining(clock.now());
                if remaining.is_zero() {
                    // the final tick is not superseded by anything; wait for room
                    let _ = tx.send_timeout(remaining, FINAL_TICK_WAIT);
                    break;
                }
                match tx.try_send(remaining) {
                    // consumer has not read the previous tick; the next one supersedes it
                    Ok(()) | Err(xch::TrySendError::Full(_)) => {}
                    Err(xch::TrySendError::Disconnected(_)) => {
                        tracing::debug!("Ticker consumer disconnected, exiting thread");
                        break;
                    }
                }
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(period.min(remaining));
            }
            tracing::trace!("Ticker thread exiting cleanly");
        });

        Self {
            rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Most recent published remaining time, if any arrived since the last call.
    pub fn latest(&self) -> Option<Duration> {
        self.rx.try_iter().last()
    }

    /// Block up to `timeout` for the next tick.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Duration> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => tracing::trace!("Ticker thread joined successfully"),
                Err(e) => tracing::warn!(?e, "Ticker thread panicked during shutdown"),
            }
        }
    }
}
