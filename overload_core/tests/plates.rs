use overload_core::plates::load_for;
use overload_core::{plate_breakdown, round_to_plates};
use proptest::prelude::*;

fn plate_pool() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop::sample::select(vec![25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 1.25, 0.5, 0.25]),
        0..14,
    )
}

proptest! {
    #[test]
    fn rounding_to_plates_is_idempotent(
        target in 0.0f64..400.0,
        plates in plate_pool(),
        bar in prop::sample::select(vec![0.0, 10.0, 15.0, 20.0]),
    ) {
        let once = round_to_plates(target, &plates, bar);
        let twice = round_to_plates(once, &plates, bar);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn never_exceeds_target_above_bar(
        target in 20.0f64..400.0,
        plates in plate_pool(),
    ) {
        let w = round_to_plates(target, &plates, 20.0);
        prop_assert!(w <= target + 1e-6);
        prop_assert!(w >= 20.0);
    }

    #[test]
    fn breakdown_is_sorted_and_sums_to_load(
        target in 0.0f64..400.0,
        plates in plate_pool(),
    ) {
        let used = plate_breakdown(target, &plates, 20.0);
        prop_assert!(used.windows(2).all(|w| w[0] >= w[1]));
        prop_assert_eq!(load_for(&used, 20.0), round_to_plates(target, &plates, 20.0));
    }
}

#[test]
fn plates_are_used_at_most_as_listed() {
    // only one 20 per side is available
    let used = plate_breakdown(120.0, &[20.0, 10.0, 10.0], 20.0);
    assert_eq!(used, vec![20.0, 10.0, 10.0]);
    assert_eq!(round_to_plates(200.0, &[20.0, 10.0, 10.0], 20.0), 100.0);
}
