//! Condition system.
//!
//! - [`Condition`]: the boolean vocabulary (`HAS_FLAG`, `HAS_ITEM`, `AND`,
//!   `OR`, `NOT`)
//! - [`ConditionEvaluator`]: evaluates a condition against a [`GameState`]
//!
//! ## Example Usage
//!
//! ```
//! use story_graph::conditions::{evaluate, Condition};
//! use story_graph::core::GameState;
//!
//! let mut state = GameState::default();
//! let lit = Condition::item("Lantern").and(Condition::flag("oil"));
//!
//! assert!(!evaluate(Some(&lit), &state));
//!
//! state.add_item("Lantern");
//! state.set_flag("oil", true);
//! assert!(evaluate(Some(&lit), &state));
//!
//! // No condition means "always"
//! assert!(evaluate(None, &state));
//! ```
//!
//! [`GameState`]: crate::core::GameState

mod condition;
mod evaluator;

pub use condition::{Condition, ConditionIssue};
pub use evaluator::{evaluate, ConditionEvaluator};
