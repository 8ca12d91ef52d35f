use overload_core::{Decision, ExerciseConfig, PlateSet, RepRange, compute_next_start};
use rstest::rstest;

fn cfg(base: f64, cap: f64) -> ExerciseConfig {
    ExerciseConfig::new("bench", RepRange::new(5, 8), base, 2.5).with_weekly_cap_pct(cap)
}

#[test]
fn weekly_cap_clamps_single_escalation() {
    let next = compute_next_start(100.0, Decision::EscalateSingle, &cfg(10.0, 5.0), &[100.0]);
    assert_eq!(next.start_weight, 105.0);
    assert!(next.cap_applied);
    assert!(next.reason.contains("cap"), "reason: {}", next.reason);
}

#[rstest]
#[case(Decision::EscalateDouble, 110.0)]
#[case(Decision::EscalateSingle, 105.0)]
#[case(Decision::Hold, 100.0)]
#[case(Decision::Reduce, 95.0)]
fn decision_steps_within_cap(#[case] decision: Decision, #[case] expected: f64) {
    let next = compute_next_start(100.0, decision, &cfg(5.0, 10.0), &[]);
    assert_eq!(next.start_weight, expected);
    assert!(!next.cap_applied);
}

#[test]
fn capped_value_is_rerounded() {
    // 100 + 2*5 = 110 over an 8% cap -> 108 -> 107.5 on the 2.5 grid
    let next = compute_next_start(100.0, Decision::EscalateDouble, &cfg(5.0, 8.0), &[95.0, 100.0]);
    assert_eq!(next.start_weight, 107.5);
    assert!(next.cap_applied);
}

#[test]
fn recent_loads_above_last_start_do_not_trigger_cap() {
    // after a reduce from 110 the recent window only holds heavier starts
    let next = compute_next_start(100.0, Decision::EscalateDouble, &cfg(5.0, 5.0), &[110.0]);
    assert_eq!(next.start_weight, 110.0);
    assert!(!next.cap_applied);
}

#[test]
fn lowest_recent_load_is_the_cap_baseline() {
    // 115 - 95 exceeds 10% of 105, but the clamp 105 + 10.5 rounds back to 115
    let next = compute_next_start(105.0, Decision::EscalateDouble, &cfg(5.0, 10.0), &[110.0, 95.0]);
    assert_eq!(next.start_weight, 115.0);
    assert!(!next.cap_applied);

    let next = compute_next_start(105.0, Decision::EscalateDouble, &cfg(5.0, 5.0), &[110.0, 95.0]);
    assert_eq!(next.start_weight, 110.0);
    assert!(next.cap_applied);
}

#[test]
fn cap_never_raises_a_hold() {
    let next = compute_next_start(100.0, Decision::Hold, &cfg(5.0, 2.0), &[80.0]);
    assert_eq!(next.start_weight, 100.0);
    assert!(!next.cap_applied);
}

#[test]
fn plates_and_floor_apply_last() {
    let c = cfg(5.0, 10.0).with_plates(PlateSet::new(20.0, vec![20.0, 10.0, 5.0, 1.25]));
    // 67.5 needs 23.75 per side; without a 2.5 plate the best is 20 + 1.25
    let next = compute_next_start(62.5, Decision::EscalateSingle, &c, &[]);
    assert_eq!(next.start_weight, 62.5);
    assert!(next.reason.contains("plates"));

    let light = cfg(10.0, 10.0);
    let next = compute_next_start(5.0, Decision::Reduce, &light, &[]);
    assert_eq!(next.start_weight, 0.0);
}
