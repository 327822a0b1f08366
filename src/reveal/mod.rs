//! Incremental text reveal.
//!
//! Resolved scene text is shown a few characters at a time. The
//! [`RevealEngine`] is a plain state machine (`Idle -> Revealing -> Done`)
//! that the host ticks from its own loop; it never sleeps or spawns.
//!
//! - `tick` appends the next characters and reports the prefix
//! - `skip` jumps to the full text and completes
//! - `cancel` stops without completing
//!
//! Markup spans (`<...>`) are revealed in one step, so no displayed prefix
//! ends inside a tag.
//!
//! ## Example Usage
//!
//! ```
//! use story_graph::reveal::{RevealEngine, RevealState};
//!
//! let mut engine = RevealEngine::default();
//! engine.start("<i>Hush.</i>", |prefix| assert!(!prefix.ends_with("<i")), || {});
//!
//! assert_eq!(engine.run_to_end(|_| {}), RevealState::Done);
//! assert_eq!(engine.displayed(), "<i>Hush.</i>");
//! ```

mod engine;

pub use engine::{DoneCallback, RevealEngine, RevealHandle, RevealState, TickCallback};
