pub mod clock;

pub use clock::{Clock, MonotonicClock};

#[cfg(any(test, feature = "manual-clock"))]
pub use clock::manual::ManualClock;
