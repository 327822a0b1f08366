//! Error types.
//!
//! `StoryError` covers everything that can go wrong while playing a graph.
//! None of these cross the playback loop as panics; the host decides what a
//! failed resolution means (usually: report it and return to the start).
//!
//! Malformed conditions and effects are deliberately absent here. They are
//! played permissively and reported by the validator instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::NodeId;

/// Which branch of a logic node was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    True,
    False,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
        }
    }
}

/// Kind of scene an action expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneKind {
    Choice,
    Input,
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice => f.write_str("choice"),
            Self::Input => f.write_str("input"),
        }
    }
}

/// Errors raised while resolving scenes or applying player actions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoryError {
    /// A requested or linked node does not exist.
    #[error("scene '{0}' not found")]
    SceneNotFound(NodeId),

    /// A logic node chose a branch that has no target.
    #[error("logic node '{node}' has no {branch} branch")]
    DanglingLogicBranch {
        /// The logic node.
        node: NodeId,
        /// The branch its condition selected.
        branch: Branch,
    },

    /// Automatic resolution came back to a logic node it already passed.
    #[error("logic cycle detected at '{node}' (path: {})", format_path(.path))]
    LogicCycleDetected {
        /// The node that was visited twice.
        node: NodeId,
        /// Logic nodes visited in this pass, in order.
        path: Vec<NodeId>,
    },

    /// A choice or direct link points nowhere.
    #[error("scene '{0}' has no target to continue to")]
    MissingTarget(NodeId),

    /// The chosen option does not exist or is hidden by its condition.
    #[error("choice {index} is not available in scene '{node}'")]
    ChoiceUnavailable {
        /// The scene the choice was made in.
        node: NodeId,
        /// Index into the scene's choice list.
        index: usize,
    },

    /// An action was applied to a node of the wrong type.
    #[error("scene '{node}' is not a {expected} scene")]
    WrongSceneKind {
        /// The node the action targeted.
        node: NodeId,
        /// The kind the action needs.
        expected: SceneKind,
    },

    /// Player input was blank after trimming.
    #[error("input must not be empty")]
    EmptyInput,

    /// An action was attempted after the session reached an ending.
    #[error("the session has ended")]
    SessionOver,
}

fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors raised while decoding stories, configuration or snapshots.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Invalid JSON, or JSON that does not match the story shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A state snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = StoryError::LogicCycleDetected {
            node: NodeId::new("a"),
            path: vec![NodeId::new("a"), NodeId::new("b")],
        };
        assert_eq!(
            err.to_string(),
            "logic cycle detected at 'a' (path: a -> b)"
        );
    }

    #[test]
    fn test_dangling_message() {
        let err = StoryError::DanglingLogicBranch {
            node: NodeId::new("gate"),
            branch: Branch::False,
        };
        assert_eq!(err.to_string(), "logic node 'gate' has no false branch");
    }

    #[test]
    fn test_load_error_from_json() {
        let err: LoadError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
