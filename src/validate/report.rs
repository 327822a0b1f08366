//! Validation findings and the report that groups them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::NodeId;

/// Whether a finding blocks play or only deserves a look.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// What kind of problem a finding describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    /// No path from the start leads here.
    Unreachable,
    /// A non-terminal node with no way out.
    DeadEnd,
    /// The start node does not exist.
    MissingStart,
    /// An edge points at a node that does not exist, or nowhere.
    BrokenLink,
    /// A condition `type` outside the vocabulary.
    UnknownCondition,
    /// An effect `type` outside the vocabulary.
    UnknownEffect,
    /// A `NOT` condition without a child.
    EmptyNegation,
}

impl FindingKind {
    /// Severity of this kind of finding.
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::Unreachable | Self::UnknownCondition | Self::UnknownEffect => Severity::Warning,
            Self::DeadEnd | Self::MissingStart | Self::BrokenLink | Self::EmptyNegation => {
                Severity::Error
            }
        }
    }
}

/// One problem at one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub node: NodeId,
    pub kind: FindingKind,
    pub message: String,
}

impl Finding {
    pub(crate) fn new(node: &NodeId, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            node: node.clone(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.node, self.message)
    }
}

/// Everything the validator found, split by severity and ordered by node id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
}

impl ValidationReport {
    /// True if there are no errors. Warnings do not count.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.errors.is_empty()
    }

    /// True if nothing at all was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Findings of one kind, errors first.
    pub fn of_kind(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |f| f.kind == kind)
    }

    pub(crate) fn push(&mut self, finding: Finding) {
        match finding.kind.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    /// Order both lists by node id. The sort is stable, so findings for
    /// the same node keep pass order.
    pub(crate) fn sort(&mut self) {
        self.errors.sort_by(|a, b| a.node.cmp(&b.node));
        self.warnings.sort_by(|a, b| a.node.cmp(&b.node));
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inspection Results")?;
        if self.is_clean() {
            return writeln!(f, "No problems found.");
        }

        if !self.errors.is_empty() {
            writeln!(f, "Errors ({}):", self.errors.len())?;
            for finding in &self.errors {
                writeln!(f, "  {}", finding)?;
            }
        }
        if !self.warnings.is_empty() {
            writeln!(f, "Warnings ({}):", self.warnings.len())?;
            for finding in &self.warnings {
                writeln!(f, "  {}", finding)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_by_severity() {
        let mut report = ValidationReport::default();
        report.push(Finding::new(&NodeId::new("b"), FindingKind::DeadEnd, "dead end"));
        report.push(Finding::new(&NodeId::new("a"), FindingKind::Unreachable, "unreachable"));

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert!(!report.is_playable());
        assert_eq!(report.of_kind(FindingKind::Unreachable).count(), 1);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut report = ValidationReport::default();
        report.push(Finding::new(&NodeId::new("b"), FindingKind::DeadEnd, "first"));
        report.push(Finding::new(&NodeId::new("a"), FindingKind::BrokenLink, "x"));
        report.push(Finding::new(&NodeId::new("b"), FindingKind::BrokenLink, "second"));
        report.sort();

        let messages: Vec<&str> = report.errors.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, vec!["x", "first", "second"]);
    }

    #[test]
    fn test_display() {
        let mut report = ValidationReport::default();
        assert_eq!(report.to_string(), "Inspection Results\nNo problems found.\n");

        report.push(Finding::new(&NodeId::new("a"), FindingKind::DeadEnd, "no exit"));
        assert_eq!(
            report.to_string(),
            "Inspection Results\nErrors (1):\n  [a] no exit\n"
        );
    }
}
