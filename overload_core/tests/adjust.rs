use overload_core::adjust::{advance_prescription, emergency_drop, replay_prescription};
use overload_core::bad_session::should_drop_mid_exercise;
use overload_core::{ExerciseConfig, Prescription, Rating, RepRange, SetOutcome, micro_adjust};
use proptest::prelude::*;
use rstest::rstest;

const RANGE: RepRange = RepRange::new(5, 8);

fn rx(weight: f64, reps: u32) -> Prescription {
    Prescription { weight, reps }
}

#[rstest]
// fail always drops the base increment and targets min
#[case(100.0, 8, Rating::Fail, Some(2.5), rx(95.0, 5))]
#[case(100.0, 2, Rating::Fail, None, rx(95.0, 5))]
// very-hard below min drops base, otherwise holds with clamped reps
#[case(100.0, 4, Rating::VeryHard, Some(2.5), rx(95.0, 5))]
#[case(100.0, 6, Rating::VeryHard, Some(2.5), rx(100.0, 6))]
#[case(100.0, 10, Rating::VeryHard, None, rx(100.0, 8))]
// hard below min drops the micro step when present, base otherwise
#[case(100.0, 4, Rating::Hard, Some(2.5), rx(97.5, 5))]
#[case(100.0, 4, Rating::Hard, None, rx(95.0, 5))]
#[case(100.0, 7, Rating::Hard, Some(2.5), rx(100.0, 7))]
// easy at max adds the micro step only when one exists
#[case(95.0, 8, Rating::Easy, Some(2.5), rx(97.5, 8))]
#[case(95.0, 9, Rating::Easy, Some(2.5), rx(97.5, 8))]
#[case(95.0, 8, Rating::Easy, None, rx(95.0, 8))]
#[case(95.0, 6, Rating::Easy, Some(2.5), rx(95.0, 6))]
#[case(95.0, 3, Rating::Easy, Some(2.5), rx(95.0, 5))]
fn micro_adjust_rules(
    #[case] weight: f64,
    #[case] reps: u32,
    #[case] rating: Rating,
    #[case] micro: Option<f64>,
    #[case] expected: Prescription,
) {
    assert_eq!(micro_adjust(weight, reps, RANGE, rating, 5.0, micro, 2.5), expected);
}

#[test]
fn results_pass_through_rounding() {
    // 96 held on a 2.5 granularity lands on 95
    assert_eq!(micro_adjust(96.0, 6, RANGE, Rating::Hard, 5.0, None, 2.5), rx(95.0, 6));
    // 98.75 + 2.5 = 101.25 -> tie rounds up to 102.5
    assert_eq!(
        micro_adjust(98.75, 8, RANGE, Rating::Easy, 5.0, Some(2.5), 2.5),
        rx(102.5, 8)
    );
}

fn rating() -> impl Strategy<Value = Rating> {
    prop::sample::select(Rating::ALL.to_vec())
}

proptest! {
    #[test]
    fn never_negative_and_reps_in_range(
        weight in 0.0f64..500.0,
        reps in 0u32..=100,
        rating in rating(),
        min in 1u32..15,
        span in 0u32..10,
        base in 0.0f64..20.0,
        micro in prop::option::of(0.25f64..5.0),
        rounding in prop::sample::select(vec![0.5, 1.0, 1.25, 2.5, 5.0]),
    ) {
        let range = RepRange::new(min, min + span);
        let out = micro_adjust(weight, reps, range, rating, base, micro, rounding);
        prop_assert!(out.weight >= 0.0);
        prop_assert!(range.contains(out.reps));
    }
}

fn outcome(i: u32, reps: u32, rating: Rating, weight: f64) -> SetOutcome {
    SetOutcome {
        set_index: i,
        target_reps: reps,
        target_weight: weight,
        achieved_reps: reps,
        rating,
        actual_weight: weight,
    }
}

#[rstest]
#[case(Rating::Fail, Rating::VeryHard, true)]
#[case(Rating::VeryHard, Rating::VeryHard, true)]
#[case(Rating::Fail, Rating::Fail, true)]
#[case(Rating::Fail, Rating::Hard, false)]
#[case(Rating::Hard, Rating::Fail, false)]
#[case(Rating::Easy, Rating::Easy, false)]
fn bad_session_looks_at_first_two(#[case] a: Rating, #[case] b: Rating, #[case] expected: bool) {
    let sets = vec![
        outcome(1, 5, a, 100.0),
        outcome(2, 5, b, 100.0),
        outcome(3, 8, Rating::Easy, 100.0),
    ];
    assert_eq!(should_drop_mid_exercise(&sets), expected);
    assert!(!should_drop_mid_exercise(&sets[..1]));
}

fn squat() -> ExerciseConfig {
    ExerciseConfig::new("squat", RANGE, 5.0, 2.5).with_micro_step(2.5)
}

#[test]
fn emergency_drop_freezes_the_prescription() {
    let cfg = squat();
    let sets = vec![
        outcome(1, 5, Rating::Fail, 100.0),
        outcome(2, 4, Rating::VeryHard, 95.0),
    ];
    let (after_first, dropped) = advance_prescription(&cfg, rx(100.0, 5), &sets[..1], false);
    assert_eq!((after_first, dropped), (rx(95.0, 5), false));

    let (after_second, dropped) = advance_prescription(&cfg, after_first, &sets, false);
    assert!(dropped);
    assert_eq!(after_second, emergency_drop(&cfg, 95.0));
    assert_eq!(after_second, rx(90.0, 5));

    // an easy third set no longer moves the frozen prescription
    let mut more = sets.clone();
    more.push(outcome(3, 8, Rating::Easy, 90.0));
    assert_eq!(advance_prescription(&cfg, after_second, &more, true), (rx(90.0, 5), true));
}

#[test]
fn replay_matches_incremental_logging() {
    let cfg = squat();
    let sets = vec![
        outcome(1, 7, Rating::Hard, 95.0),
        outcome(2, 8, Rating::Easy, 95.0),
    ];
    assert_eq!(replay_prescription(&cfg, 95.0, &[]), (rx(95.0, 5), false));
    assert_eq!(replay_prescription(&cfg, 95.0, &sets), (rx(97.5, 8), false));
}
