//! Story nodes and choice edges.
//!
//! A node is one vertex of the story graph. The editor stores nodes as
//! flat JSON records tagged by `type` (absent means `choice`), with fields
//! that only make sense for some types. Here each type is its own variant,
//! and the flat record only exists at the serde boundary.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::conditions::Condition;
use crate::core::ids::link;
use crate::core::NodeId;
use crate::effects::Effect;
use crate::text::TextEntry;

/// Message shown by a death node without one.
pub const DEFAULT_DEATH_MESSAGE: &str = "You died.";

/// Message shown by a win node without one.
pub const DEFAULT_WIN_MESSAGE: &str = "You won!";

/// A player option leading out of a choice scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// Button label. Variables are substituted.
    #[serde(default)]
    pub text: String,

    /// Target node. `death`/`win` end the session when no such node exists.
    #[serde(default, deserialize_with = "link", skip_serializing_if = "Option::is_none")]
    pub next: Option<NodeId>,

    /// Visibility guard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    /// Applied when picked, before moving on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,

    /// Minutes the clock advances when picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<i64>,

    /// Message for the `death` pseudo-target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_message: Option<String>,

    /// Message for the `win` pseudo-target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_message: Option<String>,
}

impl Choice {
    /// Create a choice leading to `next`.
    pub fn new(text: impl Into<String>, next: impl Into<NodeId>) -> Self {
        Self {
            text: text.into(),
            next: Some(next.into()),
            ..Self::default()
        }
    }

    /// Only show this choice when `condition` holds.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Add an effect applied on pick.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Advance the clock on pick.
    #[must_use]
    pub fn with_time_cost(mut self, minutes: i64) -> Self {
        self.time_cost = Some(minutes);
        self
    }
}

/// Scene metadata shared by the interactive node types.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneInfo {
    /// Location label for the host's status bar.
    pub location: Option<String>,

    /// Illustration URL.
    pub image: Option<String>,

    /// Clock time (minutes) forced on entry.
    pub time_set: Option<i64>,

    /// Applied on entry.
    pub effects: Vec<Effect>,
}

/// An interactive scene with player choices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChoiceNode {
    pub text: TextEntry,
    pub choices: Vec<Choice>,
    /// Direct continuation, used only when there are no choices.
    pub next: Option<NodeId>,
    pub scene: SceneInfo,
}

impl ChoiceNode {
    /// Create a scene with text and no exits.
    pub fn new(text: impl Into<TextEntry>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Add a choice.
    #[must_use]
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Set the direct continuation.
    #[must_use]
    pub fn with_next(mut self, next: impl Into<NodeId>) -> Self {
        self.next = Some(next.into());
        self
    }

    /// Add an entry effect.
    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.scene.effects.push(effect);
        self
    }

    /// Force the clock on entry.
    #[must_use]
    pub fn with_time_set(mut self, minutes: i64) -> Self {
        self.scene.time_set = Some(minutes);
        self
    }

    /// Set the location label.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.scene.location = Some(location.into());
        self
    }
}

/// An interactive scene asking the player to type text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputNode {
    pub text: TextEntry,
    /// `flags.<name>`, a state field name, or `None` for the player name.
    pub variable: Option<String>,
    pub next: Option<NodeId>,
    pub scene: SceneInfo,
}

impl InputNode {
    /// Create an input scene storing into `variable`.
    pub fn new(text: impl Into<TextEntry>, variable: Option<&str>, next: impl Into<NodeId>) -> Self {
        Self {
            text: text.into(),
            variable: variable.map(str::to_string),
            next: Some(next.into()),
            scene: SceneInfo::default(),
        }
    }
}

/// A non-interactive branch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogicNode {
    pub condition: Option<Condition>,
    pub next_true: Option<NodeId>,
    pub next_false: Option<NodeId>,
}

impl LogicNode {
    /// Create a branch on `condition`.
    pub fn new(
        condition: Condition,
        next_true: impl Into<NodeId>,
        next_false: impl Into<NodeId>,
    ) -> Self {
        Self {
            condition: Some(condition),
            next_true: Some(next_true.into()),
            next_false: Some(next_false.into()),
        }
    }
}

/// A death or win ending.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerminalNode {
    pub message: Option<String>,
}

/// One vertex of the story graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub enum Node {
    Choice(ChoiceNode),
    Input(InputNode),
    Logic(LogicNode),
    Death(TerminalNode),
    Win(TerminalNode),
}

impl Node {
    /// A death ending.
    pub fn death(message: impl Into<String>) -> Self {
        Self::Death(TerminalNode {
            message: Some(message.into()),
        })
    }

    /// A win ending.
    pub fn win(message: impl Into<String>) -> Self {
        Self::Win(TerminalNode {
            message: Some(message.into()),
        })
    }

    /// The `type` tag used in JSON.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Choice(_) => "choice",
            Self::Input(_) => "input",
            Self::Logic(_) => "logic",
            Self::Death(_) => "death",
            Self::Win(_) => "win",
        }
    }

    /// True for death and win nodes.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Death(_) | Self::Win(_))
    }

    /// Every static outgoing edge, regardless of conditions.
    #[must_use]
    pub fn edges(&self) -> SmallVec<[&NodeId; 4]> {
        let mut edges = SmallVec::new();
        match self {
            Self::Choice(node) => {
                edges.extend(node.choices.iter().filter_map(|c| c.next.as_ref()));
                edges.extend(node.next.as_ref());
            }
            Self::Input(node) => edges.extend(node.next.as_ref()),
            Self::Logic(node) => {
                edges.extend(node.next_true.as_ref());
                edges.extend(node.next_false.as_ref());
            }
            Self::Death(_) | Self::Win(_) => {}
        }
        edges
    }

    /// Whether the node has a way out, for dead-end checks.
    ///
    /// A choice counts even when its target is empty; broken targets are a
    /// separate finding.
    #[must_use]
    pub fn has_exit(&self) -> bool {
        match self {
            Self::Choice(node) => !node.choices.is_empty() || node.next.is_some(),
            Self::Input(node) => node.next.is_some(),
            Self::Logic(node) => node.next_true.is_some() || node.next_false.is_some(),
            Self::Death(_) | Self::Win(_) => false,
        }
    }

    /// Every condition attached to this node, its choices and its text.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        match self {
            Self::Choice(node) => {
                let mut all = text_conditions(&node.text);
                all.extend(node.choices.iter().filter_map(|c| c.condition.as_ref()));
                all
            }
            Self::Input(node) => text_conditions(&node.text),
            Self::Logic(node) => node.condition.iter().collect(),
            Self::Death(_) | Self::Win(_) => Vec::new(),
        }
    }

    /// Every effect attached to this node and its choices.
    #[must_use]
    pub fn effects(&self) -> Vec<&Effect> {
        match self {
            Self::Choice(node) => node
                .scene
                .effects
                .iter()
                .chain(node.choices.iter().flat_map(|c| c.effects.iter()))
                .collect(),
            Self::Input(node) => node.scene.effects.iter().collect(),
            Self::Logic(_) | Self::Death(_) | Self::Win(_) => Vec::new(),
        }
    }
}

fn text_conditions(text: &TextEntry) -> Vec<&Condition> {
    match text {
        TextEntry::Plain(_) => Vec::new(),
        TextEntry::Variants(variants) => variants.iter().filter_map(|v| v.condition.as_ref()).collect(),
    }
}

impl From<ChoiceNode> for Node {
    fn from(node: ChoiceNode) -> Self {
        Self::Choice(node)
    }
}

impl From<InputNode> for Node {
    fn from(node: InputNode) -> Self {
        Self::Input(node)
    }
}

impl From<LogicNode> for Node {
    fn from(node: LogicNode) -> Self {
        Self::Logic(node)
    }
}

/// Flat record as written by the editor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<TextEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    choices: Vec<Choice>,
    #[serde(default, deserialize_with = "link", skip_serializing_if = "Option::is_none")]
    next: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
    #[serde(default, deserialize_with = "link", skip_serializing_if = "Option::is_none")]
    next_true: Option<NodeId>,
    #[serde(default, deserialize_with = "link", skip_serializing_if = "Option::is_none")]
    next_false: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    death_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    win_message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    effects: Vec<Effect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_set: Option<i64>,
}

impl From<RawNode> for Node {
    fn from(raw: RawNode) -> Self {
        let scene = SceneInfo {
            location: raw.location,
            image: raw.image,
            time_set: raw.time_set,
            effects: raw.effects,
        };

        match raw.kind.as_deref() {
            Some("logic") => Self::Logic(LogicNode {
                condition: raw.condition,
                next_true: raw.next_true,
                next_false: raw.next_false,
            }),
            Some("death") => Self::Death(TerminalNode {
                message: raw.death_message,
            }),
            Some("win") => Self::Win(TerminalNode {
                message: raw.win_message,
            }),
            Some("input") => Self::Input(InputNode {
                text: raw.text.unwrap_or_default(),
                variable: raw.variable,
                next: raw.next,
                scene,
            }),
            kind => {
                if let Some(other) = kind.filter(|k| *k != "choice") {
                    warn!(kind = other, "unknown node type, reading as choice");
                }
                Self::Choice(ChoiceNode {
                    text: raw.text.unwrap_or_default(),
                    choices: raw.choices,
                    next: raw.next,
                    scene,
                })
            }
        }
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let kind = Some(node.type_name().to_string());
        let with_scene = |raw: RawNode, scene: SceneInfo| RawNode {
            location: scene.location,
            image: scene.image,
            time_set: scene.time_set,
            effects: scene.effects,
            ..raw
        };

        match node {
            Node::Choice(n) => with_scene(
                RawNode {
                    kind,
                    text: Some(n.text),
                    choices: n.choices,
                    next: n.next,
                    ..RawNode::default()
                },
                n.scene,
            ),
            Node::Input(n) => with_scene(
                RawNode {
                    kind,
                    text: Some(n.text),
                    variable: n.variable,
                    next: n.next,
                    ..RawNode::default()
                },
                n.scene,
            ),
            Node::Logic(n) => RawNode {
                kind,
                condition: n.condition,
                next_true: n.next_true,
                next_false: n.next_false,
                ..RawNode::default()
            },
            Node::Death(n) => RawNode {
                kind,
                death_message: n.message,
                ..RawNode::default()
            },
            Node::Win(n) => RawNode {
                kind,
                win_message: n.message,
                ..RawNode::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Node {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_untyped_is_choice() {
        let node = parse(r#"{"text": "Hello", "choices": [{"text": "Go", "next": "b"}]}"#);

        match node {
            Node::Choice(n) => {
                assert_eq!(n.text, TextEntry::from("Hello"));
                assert_eq!(n.choices, vec![Choice::new("Go", "b")]);
            }
            other => panic!("Expected Choice, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_choice() {
        let node = parse(r#"{"type": "cutscene", "text": "...", "next": "b"}"#);
        assert_eq!(node.type_name(), "choice");
        assert_eq!(node.edges().as_slice(), &[&NodeId::new("b")]);
    }

    #[test]
    fn test_editor_fields_ignored() {
        let node = parse(
            r#"{"id": "a", "type": "choice", "text": "x", "choices": [],
                "_editor": {"x": 10, "y": 20}, "next": "b"}"#,
        );
        assert!(node.has_exit());
    }

    #[test]
    fn test_logic_node() {
        let node = parse(
            r#"{"type": "logic", "condition": {"type": "HAS_ITEM", "item": "Key"},
                "nextTrue": "open", "nextFalse": ""}"#,
        );

        assert_eq!(
            node,
            Node::Logic(LogicNode {
                condition: Some(Condition::item("Key")),
                next_true: Some(NodeId::new("open")),
                next_false: None,
            })
        );
        assert!(node.has_exit());
        assert_eq!(node.edges().len(), 1);
    }

    #[test]
    fn test_terminal_nodes() {
        let death = parse(r#"{"type": "death", "deathMessage": "Frozen."}"#);
        assert_eq!(death, Node::death("Frozen."));
        assert!(death.is_terminal());
        assert!(!death.has_exit());

        let win = parse(r#"{"type": "win"}"#);
        assert_eq!(win, Node::Win(TerminalNode { message: None }));
        assert!(win.edges().is_empty());
    }

    #[test]
    fn test_input_node() {
        let node = parse(
            r#"{"type": "input", "text": "Name?", "variable": "flags.nickname", "next": "hall"}"#,
        );
        assert_eq!(
            node,
            Node::Input(InputNode::new("Name?", Some("flags.nickname"), "hall"))
        );
    }

    #[test]
    fn test_scene_info() {
        let node = parse(
            r#"{"text": "Dawn", "location": "Camp", "timeSet": 360,
                "effects": [{"type": "ADD_ITEM", "item": "Bread"}], "next": "b"}"#,
        );

        let Node::Choice(n) = node else {
            panic!("Expected Choice");
        };
        assert_eq!(n.scene.location.as_deref(), Some("Camp"));
        assert_eq!(n.scene.time_set, Some(360));
        assert_eq!(n.scene.effects, vec![Effect::add_item("Bread")]);
    }

    #[test]
    fn test_edges_include_every_target() {
        let node: Node = ChoiceNode::new("x")
            .with_choice(Choice::new("a", "one"))
            .with_choice(Choice::new("b", "two").when(Condition::flag("never")))
            .with_next("three")
            .into();

        let edges: Vec<&str> = node.edges().iter().map(|id| id.as_str()).collect();
        assert_eq!(edges, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_conditions_and_effects() {
        let node: Node = ChoiceNode::new(TextEntry::Variants(vec![
            crate::text::TextVariant::when("A", Condition::flag("x")),
        ]))
        .with_choice(Choice::new("a", "one").when(Condition::item("Key")).with_effect(Effect::Restart))
        .with_effect(Effect::add_item("Bread"))
        .into();

        assert_eq!(node.conditions().len(), 2);
        assert_eq!(node.effects(), vec![&Effect::add_item("Bread"), &Effect::Restart]);
    }

    #[test]
    fn test_round_trip() {
        let node: Node = ChoiceNode::new("Dawn")
            .with_choice(Choice::new("Go", "b").with_time_cost(15))
            .with_location("Camp")
            .into();

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"type\":\"choice\""));
        assert!(json.contains("\"timeCost\":15"));

        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
