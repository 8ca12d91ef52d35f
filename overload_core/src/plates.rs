//! Discrete plate loading for bar-based equipment.
//!
//! `plates` is the multiset of per-side units available, one entry per
//! physical plate pair (a weight listed twice can be used twice). The
//! search is greedy largest-first, which is exact for standard plate
//! inventories but can miss an achievable load for unusual ones
//! (e.g. `[5, 3, 3]` with 6 per side yields 5, not 3+3).

use crate::rounding::{WEIGHT_EPS, snap};

fn sorted_desc(plates: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = plates
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();
    v.sort_by(|a, b| b.total_cmp(a));
    v
}

/// Per-side plates used to approach `target`, sorted descending.
///
/// Empty when the target does not exceed the bar.
pub fn plate_breakdown(target: f64, plates: &[f64], bar_weight: f64) -> Vec<f64> {
    let per_side = (target - bar_weight) / 2.0;
    if !per_side.is_finite() || per_side <= 0.0 {
        return Vec::new();
    }
    let mut remaining = per_side;
    let mut used = Vec::new();
    for plate in sorted_desc(plates) {
        if remaining + WEIGHT_EPS >= plate {
            used.push(plate);
            remaining -= plate;
        }
    }
    used
}

/// Total load for a per-side breakdown on the given bar.
pub fn load_for(breakdown: &[f64], bar_weight: f64) -> f64 {
    snap(bar_weight + 2.0 * breakdown.iter().sum::<f64>())
}

/// Best achievable symmetric load not above `target` (greedy).
///
/// Returns the bar weight whenever `target <= bar_weight`.
pub fn round_to_plates(target: f64, plates: &[f64], bar_weight: f64) -> f64 {
    load_for(&plate_breakdown(target, plates, bar_weight), bar_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLYMPIC: [f64; 12] = [25.0, 20.0, 15.0, 10.0, 5.0, 5.0, 2.5, 2.5, 1.25, 1.25, 0.5, 0.5];

    #[test]
    fn below_bar_returns_bar() {
        assert_eq!(round_to_plates(15.0, &OLYMPIC, 20.0), 20.0);
        assert_eq!(round_to_plates(20.0, &OLYMPIC, 20.0), 20.0);
        assert!(plate_breakdown(20.0, &OLYMPIC, 20.0).is_empty());
    }

    #[test]
    fn exact_load_uses_expected_plates() {
        assert_eq!(
            plate_breakdown(100.0, &OLYMPIC, 20.0),
            vec![25.0, 15.0]
        );
        assert_eq!(round_to_plates(100.0, &OLYMPIC, 20.0), 100.0);
    }

    #[test]
    fn unreachable_remainder_rounds_down() {
        // 20 + 2*(25+15+0.5) = 101; 101.9 leaves 0.45 per side unused
        assert_eq!(round_to_plates(101.9, &OLYMPIC, 20.0), 101.0);
    }

    #[test]
    fn unsorted_input_is_accepted() {
        let plates = [1.25, 10.0, 2.5, 20.0];
        assert_eq!(plate_breakdown(87.5, &plates, 20.0), vec![20.0, 10.0, 2.5, 1.25]);
    }

    #[test]
    fn greedy_limitation_is_documented_behavior() {
        assert_eq!(round_to_plates(32.0, &[5.0, 3.0, 3.0], 20.0), 30.0);
    }
}
