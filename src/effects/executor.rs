//! Effect execution - applying effects to game state.
//!
//! The `EffectExecutor` mutates the state in list order and reports every
//! change as a [`StateEvent`]. Hosts watch the events for the things they
//! render (inventory) or act on (restart); the executor never calls into
//! presentation code.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{FlagValue, GameState, StateField};

use super::Effect;

/// A state change produced by an effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEvent {
    /// A flag was written.
    FlagSet { flag: String, value: FlagValue },

    /// An item was appended to the inventory.
    ItemAdded { item: String },

    /// Every copy of an item was removed. `count` may be zero.
    ItemRemoved { item: String, count: usize },

    /// A whitelisted field was written.
    ValueSet { field: StateField },

    /// The story asked the host to reset the session.
    RestartRequested,
}

impl StateEvent {
    /// True for events the inventory display should react to.
    #[must_use]
    pub fn is_inventory_change(&self) -> bool {
        matches!(self, Self::ItemAdded { .. } | Self::ItemRemoved { .. })
    }
}

/// Result of applying a single effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    /// Effect changed the state.
    Applied(StateEvent),
    /// Effect was ignored (unknown type, field off the whitelist, bad value).
    Ignored(String),
    /// Effect requests a restart; the rest of the batch must not run.
    Restart,
}

/// Everything that happened while applying one list of effects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectOutcome {
    /// State changes, in application order.
    pub events: Vec<StateEvent>,

    /// Number of effects that were ignored.
    pub ignored: usize,

    /// Set when a `RESTART` effect ran.
    pub restart: bool,
}

impl EffectOutcome {
    /// True if any event touched the inventory.
    #[must_use]
    pub fn inventory_changed(&self) -> bool {
        self.events.iter().any(StateEvent::is_inventory_change)
    }

    /// Append another outcome's events after this one's.
    pub fn merge(&mut self, other: EffectOutcome) {
        self.events.extend(other.events);
        self.ignored += other.ignored;
        self.restart |= other.restart;
    }
}

/// Applies effects to game state.
pub struct EffectExecutor;

impl EffectExecutor {
    /// Apply a list of effects in order.
    ///
    /// Processing stops at the first `RESTART`; effects after it are not
    /// applied.
    pub fn apply(effects: &[Effect], state: &mut GameState) -> EffectOutcome {
        let mut outcome = EffectOutcome::default();

        for effect in effects {
            match Self::apply_single(effect, state) {
                ApplyResult::Applied(event) => outcome.events.push(event),
                ApplyResult::Ignored(reason) => {
                    debug!(%reason, "effect ignored");
                    outcome.ignored += 1;
                }
                ApplyResult::Restart => {
                    outcome.events.push(StateEvent::RestartRequested);
                    outcome.restart = true;
                    break;
                }
            }
        }

        outcome
    }

    /// Apply one effect.
    pub fn apply_single(effect: &Effect, state: &mut GameState) -> ApplyResult {
        match effect {
            Effect::SetFlag { flag, value } => {
                state.set_flag(flag.clone(), value.clone());
                ApplyResult::Applied(StateEvent::FlagSet {
                    flag: flag.clone(),
                    value: value.clone(),
                })
            }

            Effect::AddItem { item } => {
                state.add_item(item.clone());
                ApplyResult::Applied(StateEvent::ItemAdded { item: item.clone() })
            }

            Effect::RemoveItem { item } => {
                let count = state.remove_item(item);
                ApplyResult::Applied(StateEvent::ItemRemoved {
                    item: item.clone(),
                    count,
                })
            }

            Effect::SetValue { property, value } => {
                let Some(field) = StateField::from_name(property) else {
                    return ApplyResult::Ignored(format!(
                        "property '{}' is not writable",
                        property
                    ));
                };

                match field {
                    StateField::DayIndex | StateField::TimeMinutes => {
                        let Some(number) = value.as_integer() else {
                            return ApplyResult::Ignored(format!(
                                "{:?} is not a number for '{}'",
                                value, field
                            ));
                        };
                        if field == StateField::DayIndex {
                            state.day_index = number;
                        } else {
                            state.time_minutes = number;
                        }
                    }
                    StateField::PlayerName => state.player_name = value.as_text(),
                }

                ApplyResult::Applied(StateEvent::ValueSet { field })
            }

            Effect::Restart => ApplyResult::Restart,

            Effect::Unknown => {
                warn!("unknown effect type skipped");
                ApplyResult::Ignored("unknown effect type".to_string())
            }
        }
    }
}

/// Shorthand for [`EffectExecutor::apply`].
pub fn apply(effects: &[Effect], state: &mut GameState) -> EffectOutcome {
    EffectExecutor::apply(effects, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::SettingValue;

    #[test]
    fn test_empty_is_noop() {
        let mut state = GameState::default();
        let before = state.clone();

        let outcome = EffectExecutor::apply(&[], &mut state);

        assert_eq!(outcome, EffectOutcome::default());
        assert_eq!(state, before);
    }

    #[test]
    fn test_set_flag() {
        let mut state = GameState::default();

        let outcome = EffectExecutor::apply(&[Effect::set_flag("met_guard", true)], &mut state);

        assert!(state.flag_is_set("met_guard"));
        assert_eq!(
            outcome.events,
            vec![StateEvent::FlagSet {
                flag: "met_guard".to_string(),
                value: FlagValue::Bool(true),
            }]
        );
    }

    #[test]
    fn test_later_effect_wins() {
        let mut state = GameState::default();

        EffectExecutor::apply(
            &[Effect::set_flag("door", true), Effect::set_flag("door", false)],
            &mut state,
        );

        assert_eq!(state.flag("door"), Some(&FlagValue::Bool(false)));
    }

    #[test]
    fn test_inventory_events() {
        let mut state = GameState::default();

        let outcome = EffectExecutor::apply(
            &[Effect::add_item("Coin"), Effect::add_item("Coin"), Effect::remove_item("Coin")],
            &mut state,
        );

        assert!(outcome.inventory_changed());
        assert!(!state.has_item("Coin"));
        assert_eq!(
            outcome.events[2],
            StateEvent::ItemRemoved {
                item: "Coin".to_string(),
                count: 2,
            }
        );
    }

    #[test]
    fn test_remove_missing_item_still_notifies() {
        let mut state = GameState::default();

        let outcome = EffectExecutor::apply(&[Effect::remove_item("Lamp")], &mut state);

        assert!(outcome.inventory_changed());
        assert_eq!(
            outcome.events,
            vec![StateEvent::ItemRemoved {
                item: "Lamp".to_string(),
                count: 0,
            }]
        );
    }

    #[test]
    fn test_set_value_whitelist() {
        let mut state = GameState::default();
        let before = state.clone();

        let outcome = EffectExecutor::apply(
            &[
                Effect::set_value("dayIndex", 2),
                Effect::set_value("unknownField", 99),
            ],
            &mut state,
        );

        assert_eq!(state.day_index, 2);
        assert_eq!(outcome.ignored, 1);
        assert_eq!(
            outcome.events,
            vec![StateEvent::ValueSet { field: StateField::DayIndex }]
        );

        // Everything else untouched
        let mut expected = before;
        expected.day_index = 2;
        assert_eq!(state, expected);
    }

    #[test]
    fn test_set_value_coercion() {
        let mut state = GameState::default();

        EffectExecutor::apply(
            &[
                Effect::set_value("timeMinutes", "600"),
                Effect::set_value("playerName", 7),
                Effect::SetValue {
                    property: "dayIndex".to_string(),
                    value: SettingValue::Float(3.7),
                },
            ],
            &mut state,
        );

        assert_eq!(state.time_minutes, 600);
        assert_eq!(state.player_name, "7");
        assert_eq!(state.day_index, 3);
    }

    #[test]
    fn test_set_value_bad_number_ignored() {
        let mut state = GameState::default();

        let result = EffectExecutor::apply_single(&Effect::set_value("timeMinutes", "noon"), &mut state);

        assert!(matches!(result, ApplyResult::Ignored(_)));
        assert_eq!(state.time_minutes, 480);
    }

    #[test]
    fn test_restart_stops_batch() {
        let mut state = GameState::default();

        let outcome = EffectExecutor::apply(
            &[Effect::add_item("Key"), Effect::Restart, Effect::add_item("Lamp")],
            &mut state,
        );

        assert!(outcome.restart);
        assert!(state.has_item("Key"));
        assert!(!state.has_item("Lamp"));
        assert_eq!(outcome.events.last(), Some(&StateEvent::RestartRequested));
    }

    #[test]
    fn test_unknown_effect_skipped() {
        let mut state = GameState::default();

        let outcome = EffectExecutor::apply(&[Effect::Unknown, Effect::add_item("Key")], &mut state);

        assert_eq!(outcome.ignored, 1);
        assert!(state.has_item("Key"));
    }

    #[test]
    fn test_merge() {
        let mut first = EffectOutcome::default();
        first.events.push(StateEvent::ItemAdded { item: "Key".to_string() });

        let second = EffectOutcome {
            events: vec![StateEvent::RestartRequested],
            ignored: 1,
            restart: true,
        };
        first.merge(second);

        assert_eq!(first.events.len(), 2);
        assert_eq!(first.ignored, 1);
        assert!(first.restart);
    }
}
