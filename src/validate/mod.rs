//! Graph validation.
//!
//! Static analysis run before play, independent of any game state:
//!
//! - **Reachability**: nodes no path from the start leads to (warning)
//! - **Dead ends**: non-terminal nodes without a way out (error)
//! - **Missing start** and **broken links** (error)
//! - **Vocabulary**: unknown condition or effect types (warning), `NOT`
//!   without a child (error)
//!
//! When the start node is missing, the reachability pass is skipped: every
//! node would be unreachable, and the single missing-start error already
//! says so. Every other pass still runs.
//!
//! Win nodes, like death nodes, are never reported as dead ends.
//!
//! Findings are advisory. Play never consults the validator; a graph with
//! errors still loads and runs as far as it can.
//!
//! ## Example Usage
//!
//! ```
//! use story_graph::graph::{ChoiceNode, Node, StoryGraph};
//! use story_graph::validate::{validate, FindingKind};
//!
//! let graph = StoryGraph::new("start")
//!     .with_node("start", ChoiceNode::new("A room.").with_next("end"))
//!     .with_node("end", Node::win("Out."))
//!     .with_node("attic", ChoiceNode::new("Dust."));
//!
//! let report = validate(&graph);
//! assert_eq!(report.errors[0].kind, FindingKind::DeadEnd);
//! assert_eq!(report.warnings[0].kind, FindingKind::Unreachable);
//! ```

mod report;
mod validator;

pub use report::{Finding, FindingKind, Severity, ValidationReport};
pub use validator::{validate, GraphValidator};
