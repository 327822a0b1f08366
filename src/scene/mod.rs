//! Scene resolution and play sessions.
//!
//! The [`SceneResolver`] is the playback state machine. From a node id it
//! follows logic branches until it reaches something the player must see:
//!
//! ```text
//! Resolving(id) --logic--> Resolving(next)
//!               --choice/input--> Interactive(scene)
//!               --death/win--> Terminal(ending, message)
//! ```
//!
//! Player actions (`choose`, `advance`, `submit_input`) apply their effects
//! and resolve again. [`Session`] wraps all of this for a host.
//!
//! ## Example Usage
//!
//! ```
//! use story_graph::core::GameState;
//! use story_graph::graph::{Choice, ChoiceNode, Node, StoryGraph};
//! use story_graph::scene::{Ending, SceneResolver};
//!
//! let graph = StoryGraph::new("hall")
//!     .with_node("hall", ChoiceNode::new("A hall.").with_choice(Choice::new("Leave", "out")))
//!     .with_node("out", Node::win("Free!"));
//!
//! let resolver = SceneResolver::new(&graph);
//! let mut state = GameState::default();
//!
//! let first = resolver.resolve_from(&mut state, &graph.start_node).unwrap();
//! assert_eq!(first.scene().unwrap().choices.len(), 1);
//!
//! let last = resolver.choose(&mut state, 0).unwrap();
//! assert_eq!(last.ending(), Some(Ending::Win));
//! ```

mod resolver;
mod session;

pub use resolver::{
    resolve_from, Ending, Resolution, Resolved, Scene, SceneResolver, VisibleChoice,
    DEATH_TARGET, WIN_TARGET,
};
pub use session::{RestoreError, Session};
