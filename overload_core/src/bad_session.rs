use crate::model::SetOutcome;

/// True once at least two sets are logged and the first two were both
/// fail or very-hard.
pub fn should_drop_mid_exercise(outcomes: &[SetOutcome]) -> bool {
    match outcomes {
        [first, second, ..] => first.rating.is_red() && second.rating.is_red(),
        _ => false,
    }
}
