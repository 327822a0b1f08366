//! Static checks over a story graph.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::conditions::ConditionIssue;
use crate::core::NodeId;
use crate::effects::Effect;
use crate::graph::{Node, StoryGraph};
use crate::scene::{DEATH_TARGET, WIN_TARGET};

use super::{Finding, FindingKind, ValidationReport};

/// Runs every validation pass over a graph.
pub struct GraphValidator;

impl GraphValidator {
    /// Validate a graph. Never mutates it.
    pub fn validate(graph: &StoryGraph) -> ValidationReport {
        let mut report = ValidationReport::default();

        Self::check_start(graph, &mut report);
        Self::check_reachability(graph, &mut report);
        for (id, node) in &graph.nodes {
            Self::check_dead_end(id, node, &mut report);
            Self::check_links(graph, id, node, &mut report);
            Self::check_vocabulary(id, node, &mut report);
        }

        report.sort();
        debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "graph validated"
        );
        report
    }

    /// Node ids reachable from the start over every static edge.
    pub fn reachable(graph: &StoryGraph) -> FxHashSet<&NodeId> {
        let mut seen = FxHashSet::default();
        let Some((start, _)) = graph.nodes.get_key_value(graph.start_node.as_str()) else {
            return seen;
        };

        let mut queue = VecDeque::from([start]);
        seen.insert(start);

        while let Some(id) = queue.pop_front() {
            let Some(node) = graph.nodes.get(id) else {
                continue;
            };
            for target in node.edges() {
                if let Some((target, _)) = graph.nodes.get_key_value(target.as_str()) {
                    if seen.insert(target) {
                        queue.push_back(target);
                    }
                }
            }
        }

        seen
    }

    fn check_start(graph: &StoryGraph, report: &mut ValidationReport) {
        if graph.start_node.is_empty() {
            report.push(Finding::new(
                &graph.start_node,
                FindingKind::MissingStart,
                "no start node is set",
            ));
        } else if !graph.contains(graph.start_node.as_str()) {
            report.push(Finding::new(
                &graph.start_node,
                FindingKind::MissingStart,
                format!("start node '{}' does not exist", graph.start_node),
            ));
        }
    }

    /// Without a start node every node would be unreachable; that is
    /// already reported as one missing start.
    fn check_reachability(graph: &StoryGraph, report: &mut ValidationReport) {
        if graph.start().is_none() {
            return;
        }

        let reachable = Self::reachable(graph);
        for id in graph.nodes.keys().filter(|id| !reachable.contains(id)) {
            report.push(Finding::new(
                id,
                FindingKind::Unreachable,
                "not reachable from the start node",
            ));
        }
    }

    /// Win nodes are exempt along with death nodes: both end play, so
    /// neither needs a way out.
    fn check_dead_end(id: &NodeId, node: &Node, report: &mut ValidationReport) {
        if node.is_terminal() || node.has_exit() {
            return;
        }
        let message = match node {
            Node::Logic(_) => "logic node has neither a true nor a false branch".to_string(),
            other => format!("{} node has no way out", other.type_name()),
        };
        report.push(Finding::new(id, FindingKind::DeadEnd, message));
    }

    fn check_links(graph: &StoryGraph, id: &NodeId, node: &Node, report: &mut ValidationReport) {
        let check = |target: Option<&NodeId>, what: &str| match target {
            Some(target) if !graph.contains(target.as_str()) => Some(format!(
                "{} points to missing node '{}'",
                what, target
            )),
            _ => None,
        };

        let mut messages = Vec::new();
        match node {
            Node::Choice(scene) => {
                for (index, choice) in scene.choices.iter().enumerate() {
                    let what = format!("choice {} ('{}')", index, choice.text);
                    match &choice.next {
                        Some(target) if is_pseudo_target(target) => {}
                        Some(target) => messages.extend(check(Some(target), &what)),
                        None => messages.push(format!("{} has no target", what)),
                    }
                }
                messages.extend(check(exit_link(scene.next.as_ref()), "next"));
            }
            Node::Input(scene) => messages.extend(check(exit_link(scene.next.as_ref()), "next")),
            Node::Logic(logic) => {
                messages.extend(check(logic.next_true.as_ref(), "true branch"));
                messages.extend(check(logic.next_false.as_ref(), "false branch"));
            }
            Node::Death(_) | Node::Win(_) => {}
        }

        for message in messages {
            report.push(Finding::new(id, FindingKind::BrokenLink, message));
        }
    }

    fn check_vocabulary(id: &NodeId, node: &Node, report: &mut ValidationReport) {
        for condition in node.conditions() {
            for issue in condition.issues() {
                let finding = match issue {
                    ConditionIssue::UnknownType => Finding::new(
                        id,
                        FindingKind::UnknownCondition,
                        "unknown condition type, treated as true",
                    ),
                    ConditionIssue::EmptyNegation => Finding::new(
                        id,
                        FindingKind::EmptyNegation,
                        "NOT condition has no child",
                    ),
                };
                report.push(finding);
            }
        }

        for effect in node.effects() {
            if matches!(effect, Effect::Unknown) {
                report.push(Finding::new(
                    id,
                    FindingKind::UnknownEffect,
                    "unknown effect type, skipped",
                ));
            }
        }
    }
}

fn is_pseudo_target(target: &NodeId) -> bool {
    matches!(target.as_str(), DEATH_TARGET | WIN_TARGET)
}

/// A `next` link that must name a node. `death`/`win` end play from a
/// `next` link, but not from a logic branch.
fn exit_link(target: Option<&NodeId>) -> Option<&NodeId> {
    target.filter(|t| !is_pseudo_target(t))
}

/// Validate a graph.
pub fn validate(graph: &StoryGraph) -> ValidationReport {
    GraphValidator::validate(graph)
}
