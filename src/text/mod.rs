//! Scene text resolution.
//!
//! Scene text is authored either as a plain string or as a list of
//! variants guarded by conditions. [`TextResolver`] picks the first variant
//! that applies and expands the `{...}` variables:
//!
//! | Token            | Expands to                                    |
//! |------------------|-----------------------------------------------|
//! | `{player}`       | player name                                   |
//! | `{flags.<name>}` | flag value, or the unset-flag fallback token  |
//! | `{time}`         | clock time as `HH:MM`                         |
//! | `{<field>}`      | a state field; unknown tokens stay verbatim   |
//!
//! ```
//! use story_graph::core::GameState;
//! use story_graph::text::TextResolver;
//!
//! let mut state = GameState::default();
//! state.player_name = "Ada".to_string();
//!
//! let text = TextResolver::default().substitute("{player}, it is {time}.", &state);
//! assert_eq!(text, "Ada, it is 08:00.");
//! ```

mod resolver;

pub use resolver::{TextEntry, TextResolver, TextVariant};
