//! Condition evaluation.

use tracing::warn;

use crate::core::GameState;

use super::condition::Condition;

/// Evaluator for conditions.
///
/// Evaluation is pure and total. Malformed input (unknown tags, a `NOT`
/// without a child) evaluates to `true` so an unfinished story stays
/// playable; the validator is where those get reported.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check an optional condition. No condition means "always".
    #[must_use]
    pub fn check(condition: Option<&Condition>, state: &GameState) -> bool {
        condition.map_or(true, |c| Self::evaluate(c, state))
    }

    /// Check if a condition is satisfied.
    #[must_use]
    pub fn evaluate(condition: &Condition, state: &GameState) -> bool {
        match condition {
            Condition::HasFlag { flag, value } => state.flag_is_set(flag) == *value,

            Condition::HasItem { item } => state.has_item(item),

            Condition::And { conditions } => conditions.iter().all(|c| Self::evaluate(c, state)),

            Condition::Or { conditions } => conditions.iter().any(|c| Self::evaluate(c, state)),

            Condition::Not { condition: Some(inner) } => !Self::evaluate(inner, state),

            Condition::Not { condition: None } => {
                warn!("NOT condition without a child, treating as true");
                true
            }

            Condition::Unknown => {
                warn!("unknown condition type, treating as true");
                true
            }
        }
    }
}

/// Shorthand for [`ConditionEvaluator::check`].
#[must_use]
pub fn evaluate(condition: Option<&Condition>, state: &GameState) -> bool {
    ConditionEvaluator::check(condition, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> GameState {
        let mut state = GameState::default();
        state.set_flag("door_open", true);
        state.set_flag("nickname", "Wren");
        state.set_flag("blank", "");
        state.add_item("Key");
        state
    }

    #[test]
    fn test_none_is_true() {
        assert!(ConditionEvaluator::check(None, &GameState::default()));
    }

    #[test]
    fn test_has_flag() {
        let state = test_state();

        assert!(ConditionEvaluator::evaluate(&Condition::flag("door_open"), &state));
        assert!(!ConditionEvaluator::evaluate(&Condition::flag("missing"), &state));
        assert!(ConditionEvaluator::evaluate(&Condition::flag_unset("missing"), &state));
        assert!(!ConditionEvaluator::evaluate(&Condition::flag_unset("door_open"), &state));

        // Text flags are truthy when non-empty
        assert!(ConditionEvaluator::evaluate(&Condition::flag("nickname"), &state));
        assert!(!ConditionEvaluator::evaluate(&Condition::flag("blank"), &state));
    }

    #[test]
    fn test_has_item() {
        let state = test_state();

        assert!(ConditionEvaluator::evaluate(&Condition::item("Key"), &state));
        assert!(!ConditionEvaluator::evaluate(&Condition::item("Lamp"), &state));
    }

    #[test]
    fn test_combinators() {
        let state = test_state();

        let all_true = Condition::all([Condition::item("Key"), Condition::flag("door_open")]);
        assert!(ConditionEvaluator::evaluate(&all_true, &state));

        let all_mixed = Condition::all([Condition::item("Key"), Condition::item("Lamp")]);
        assert!(!ConditionEvaluator::evaluate(&all_mixed, &state));

        let any_true = Condition::any([Condition::item("Lamp"), Condition::flag("door_open")]);
        assert!(ConditionEvaluator::evaluate(&any_true, &state));

        let negated = Condition::item("Lamp").negate();
        assert!(ConditionEvaluator::evaluate(&negated, &state));
    }

    #[test]
    fn test_empty_identities() {
        let state = GameState::default();

        assert!(ConditionEvaluator::evaluate(&Condition::all([]), &state));
        assert!(!ConditionEvaluator::evaluate(&Condition::any([]), &state));
    }

    #[test]
    fn test_malformed_inside_combinators() {
        let state = GameState::default();

        let and = Condition::all([Condition::Unknown, Condition::item("Lamp")]);
        assert!(!ConditionEvaluator::evaluate(&and, &state));

        let or = Condition::any([Condition::item("Lamp"), Condition::Unknown]);
        assert!(ConditionEvaluator::evaluate(&or, &state));

        let not_unknown = Condition::Unknown.negate();
        assert!(!ConditionEvaluator::evaluate(&not_unknown, &state));
    }

    #[test]
    fn test_permissive_defaults() {
        let state = GameState::default();

        assert!(ConditionEvaluator::evaluate(&Condition::Unknown, &state));
        assert!(ConditionEvaluator::evaluate(&Condition::Not { condition: None }, &state));
    }
}
