//! Story graph model.
//!
//! A [`StoryGraph`] maps node ids to [`Node`]s. There are five node types:
//!
//! - `choice`: a scene with player choices, or a passage with a direct `next`
//! - `input`: a scene where the player types a value
//! - `logic`: an invisible branch on a condition
//! - `death` / `win`: endings
//!
//! The JSON form is the flat record written by the authoring editor. Empty
//! link strings read as "no link", and a missing or unknown `type` reads as
//! `choice`.
//!
//! ## Example Usage
//!
//! ```
//! use story_graph::graph::{Choice, ChoiceNode, Node, StoryGraph};
//!
//! let graph = StoryGraph::new("start")
//!     .with_node("start", ChoiceNode::new("A door.").with_choice(Choice::new("Open it", "end")))
//!     .with_node("end", Node::win("Fresh air."));
//!
//! assert_eq!(graph.start().map(Node::type_name), Some("choice"));
//! assert_eq!(graph.node("end").map(Node::is_terminal), Some(true));
//! ```

mod node;
mod story;

pub use node::{
    Choice, ChoiceNode, InputNode, LogicNode, Node, SceneInfo, TerminalNode,
    DEFAULT_DEATH_MESSAGE, DEFAULT_WIN_MESSAGE,
};
pub use story::StoryGraph;
