//! Scene identification.
//!
//! Every vertex of a story graph is addressed by a `NodeId`. The editor
//! writes ids as plain JSON strings, and uses `""` for a link that has not
//! been connected yet; those deserialize as "no link".
//!
//! ```
//! use story_graph::core::NodeId;
//!
//! let id = NodeId::new("cellar");
//! assert_eq!(id.as_str(), "cellar");
//! assert_eq!(id, NodeId::from("cellar"));
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a node in a story graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a node ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty id the editor writes for unconnected links.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Deserialize an optional link, mapping `null` and `""` to `None`.
pub(crate) fn link<'de, D>(deserializer: D) -> Result<Option<NodeId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|id| !id.is_empty()).map(NodeId))
}
