use chrono::{DateTime, Utc};
use std::thread;
use std::time::{Duration, Instant};

/// Clock abstraction for timers and persistence timestamps across the stack.
///
/// - now(): returns a monotonic Instant (countdowns are measured against it)
/// - utc_now(): wall-clock time stamped into persisted snapshots
/// - sleep(): sleeps for the provided duration (implementations may simulate)
pub trait Clock {
    fn now(&self) -> Instant;
    fn utc_now(&self) -> DateTime<Utc>;
    fn sleep(&self, d: Duration);
}

/// Default, real-time clock backed by std::time::Instant and the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

#[cfg(any(test, feature = "manual-clock"))]
pub mod manual {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Deterministic clock whose time only moves when told to.
    ///
    /// now() = origin + offset, utc_now() = utc_origin + offset.
    /// sleep(d) advances internal time by d without actually sleeping.
    /// Clones share the same offset.
    #[derive(Debug, Clone)]
    pub struct ManualClock {
        origin: Instant,
        utc_origin: DateTime<Utc>,
        offset: Arc<Mutex<Duration>>,
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self::starting_at(Utc::now())
        }

        /// Pin the wall-clock origin (useful for byte-stable snapshots in tests).
        pub fn starting_at(utc_origin: DateTime<Utc>) -> Self {
            Self {
                origin: Instant::now(),
                utc_origin,
                offset: Arc::new(Mutex::new(Duration::ZERO)),
            }
        }

        /// Advance the clock by the given duration.
        pub fn advance(&self, d: Duration) {
            if let Ok(mut off) = self.offset.lock() {
                *off = off.saturating_add(d);
            }
        }

        fn offset(&self) -> Duration {
            self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.origin + self.offset()
        }

        fn utc_now(&self) -> DateTime<Utc> {
            let off = chrono::Duration::from_std(self.offset()).unwrap_or(chrono::Duration::zero());
            self.utc_origin + off
        }

        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }

}
