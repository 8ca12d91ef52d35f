//! Rounding to a loading granularity.
//!
//! Ties round half away from zero. Results are snapped to 1e-6 so that
//! binary floating noise (e.g. `97.50000000000001`) never leaks into
//! comparisons or persisted snapshots.

/// Tolerance used when comparing weights.
pub const WEIGHT_EPS: f64 = 1e-9;

/// Snap a value to the nearest 1e-6.
#[inline]
pub fn snap(value: f64) -> f64 {
    let s = (value * 1e6).round() / 1e6;
    // avoid persisting "-0.0"
    if s == 0.0 { 0.0 } else { s }
}

/// Nearest multiple of `granularity`, ties half away from zero.
///
/// A non-positive or non-finite granularity returns `value` unchanged
/// (snapped). Non-finite values are returned as-is.
pub fn round_to(value: f64, granularity: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if !granularity.is_finite() || granularity <= 0.0 {
        return snap(value);
    }
    // Pin the quotient first so 1.05 / 0.1 lands on its tie instead of 10.4999...
    let q = ((value / granularity) * 1e9).round() / 1e9;
    snap(q.round() * granularity)
}
