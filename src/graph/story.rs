//! The story graph container.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::NodeId;
use crate::error::LoadError;

use super::Node;

/// A complete story: a start node and every node by id.
///
/// The graph is immutable during play. Nodes are kept in id order, so any
/// walk over `nodes` is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryGraph {
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Where play begins. May name a node that does not exist; the
    /// validator reports that.
    #[serde(rename = "startNode", alias = "startNodeId", default)]
    pub start_node: NodeId,

    /// All nodes.
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, Node>,
}

impl StoryGraph {
    /// Create an empty graph starting at `start`.
    pub fn new(start: impl Into<NodeId>) -> Self {
        Self {
            title: None,
            start_node: start.into(),
            nodes: BTreeMap::new(),
        }
    }

    /// Parse a graph from editor JSON.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add or replace a node.
    #[must_use]
    pub fn with_node(mut self, id: impl Into<NodeId>, node: impl Into<Node>) -> Self {
        self.insert(id, node);
        self
    }

    /// Add or replace a node, returning the previous one.
    pub fn insert(&mut self, id: impl Into<NodeId>, node: impl Into<Node>) -> Option<Node> {
        self.nodes.insert(id.into(), node.into())
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// True if a node with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// The start node, if it exists.
    #[must_use]
    pub fn start(&self) -> Option<&Node> {
        self.node(self.start_node.as_str())
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
