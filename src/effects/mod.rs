//! Effect system for story state changes.
//!
//! - `Effect`: the fixed mutation vocabulary (`SET_FLAG`, `ADD_ITEM`,
//!   `REMOVE_ITEM`, `SET_VALUE`, `RESTART`)
//! - `EffectExecutor`: applies effects to a `GameState` in order
//! - `StateEvent`: change notifications handed back to the host
//!
//! ## Example Usage
//!
//! ```
//! use story_graph::core::GameState;
//! use story_graph::effects::{apply, Effect, StateEvent};
//!
//! let mut state = GameState::default();
//! let outcome = apply(&[Effect::add_item("Lantern"), Effect::set_value("dayIndex", 2)], &mut state);
//!
//! assert!(state.has_item("Lantern"));
//! assert_eq!(state.day_index, 2);
//! assert!(outcome.inventory_changed());
//! assert!(!outcome.restart);
//! ```

mod effect;
mod executor;

pub use effect::{Effect, SettingValue};
pub use executor::{apply, ApplyResult, EffectExecutor, EffectOutcome, StateEvent};
