//! Scene resolution integration tests.
//!
//! These play the `cold_night` fixture end to end and exercise the
//! resolver's error paths on small hand-built graphs.

use story_graph::conditions::Condition;
use story_graph::core::{GameState, NodeId, SessionConfig};
use story_graph::effects::{Effect, StateEvent};
use story_graph::error::{SceneKind, StoryError};
use story_graph::graph::{Choice, ChoiceNode, LogicNode, Node, StoryGraph};
use story_graph::scene::{Ending, Resolution, SceneResolver, Session};

const COLD_NIGHT: &str = include_str!("fixtures/cold_night.json");

fn cold_night() -> StoryGraph {
    StoryGraph::from_json(COLD_NIGHT).expect("fixture should parse")
}

fn visible(session: &Session) -> Vec<usize> {
    session
        .current()
        .and_then(|r| r.scene())
        .map(|s| s.choices.iter().map(|c| c.index).collect())
        .unwrap_or_default()
}

/// Play the fixture to the winning ending.
#[test]
fn test_play_to_win() {
    let mut session = Session::new(cold_night(), SessionConfig::default());

    let first = session.start().unwrap().scene().unwrap().clone();
    assert_eq!(first.kind, SceneKind::Input);
    assert_eq!(first.text, "The wind howls. What is your name?");

    let camp = session.submit_input("  Wren ").unwrap().scene().unwrap().clone();
    assert_eq!(camp.text, "The fire crackles, Wren. It is 20:00.");
    assert_eq!(camp.location.as_deref(), Some("Camp"));
    assert_eq!(visible(&session), vec![0, 2], "key choice should be hidden");

    let woods = session.choose(0).unwrap();
    assert!(woods.outcome.inventory_changed());
    assert!(woods.scene().unwrap().can_advance);
    assert_eq!(session.state().time_minutes, 1200 + 45);
    assert!(session.state().has_item("Key"));

    let camp = session.advance().unwrap().scene().unwrap().clone();
    assert_eq!(camp.text, "The fire is out, Wren. It is 20:00.");
    assert_eq!(visible(&session), vec![0, 1, 2]);

    let end = session.choose(1).unwrap();
    assert_eq!(
        end.resolution,
        Resolution::Terminal {
            ending: Ending::Win,
            message: "Warmth at last, Wren.".to_string(),
        }
    );
    assert_eq!(end.path.as_slice(), &[NodeId::new("cabin_gate")]);
    assert!(session.is_over());
}

/// Walking into the storm uses the `death` pseudo-target.
#[test]
fn test_play_to_death() {
    let mut session = Session::new(cold_night(), SessionConfig::default());
    session.start().unwrap();
    session.submit_input("Wren").unwrap();

    let end = session.choose(2).unwrap();
    assert_eq!(end.ending(), Some(Ending::Death));
    assert_eq!(
        end.resolution,
        Resolution::Terminal {
            ending: Ending::Death,
            message: "The storm takes Wren.".to_string(),
        }
    );
}

/// An empty death message falls back to the default.
#[test]
fn test_empty_message_uses_default() {
    let graph = cold_night();
    let mut state = GameState::default();

    let resolved = SceneResolver::new(&graph)
        .resolve_from(&mut state, &NodeId::new("frozen"))
        .unwrap();

    assert_eq!(
        resolved.resolution,
        Resolution::Terminal {
            ending: Ending::Death,
            message: "You died.".to_string(),
        }
    );
}

/// Three true logic nodes in a row are not a cycle.
#[test]
fn test_logic_chain_is_not_a_cycle() {
    let graph = StoryGraph::new("l1")
        .with_node("l1", LogicNode::new(Condition::flag("a"), "l2", "fail"))
        .with_node("l2", LogicNode::new(Condition::item("b"), "l3", "fail"))
        .with_node("l3", LogicNode::new(Condition::flag("a").and(Condition::item("b")), "goal", "fail"))
        .with_node("goal", Node::win("Through."))
        .with_node("fail", Node::death("Stopped."));

    let mut state = GameState::default();
    state.set_flag("a", true);
    state.add_item("b");

    let resolved = SceneResolver::new(&graph)
        .resolve_from(&mut state, &NodeId::new("l1"))
        .unwrap();

    assert_eq!(resolved.ending(), Some(Ending::Win));
    assert_eq!(resolved.path.len(), 3);
}

/// A real cycle is reported, not looped forever.
#[test]
fn test_logic_cycle_detected() {
    let graph = StoryGraph::new("a")
        .with_node("a", LogicNode::new(Condition::flag("x"), "done", "b"))
        .with_node("b", LogicNode::new(Condition::flag("y"), "done", "c"))
        .with_node("c", LogicNode::new(Condition::flag("z"), "done", "a"))
        .with_node("done", Node::win("ok"));

    let mut state = GameState::default();
    let err = SceneResolver::new(&graph)
        .resolve_from(&mut state, &NodeId::new("a"))
        .unwrap_err();

    match err {
        StoryError::LogicCycleDetected { node, path } => {
            assert_eq!(node, NodeId::new("a"));
            assert_eq!(path.len(), 4);
        }
        other => panic!("Expected LogicCycleDetected, got {:?}", other),
    }

    // Same graph, different state: no cycle
    state.set_flag("z", true);
    assert!(SceneResolver::new(&graph)
        .resolve_from(&mut state, &NodeId::new("a"))
        .is_ok());
}

/// Errors leave the session where it was.
#[test]
fn test_broken_link_is_recoverable() {
    let graph = StoryGraph::new("a").with_node(
        "a",
        ChoiceNode::new("x")
            .with_choice(Choice::new("ghost", "missing"))
            .with_choice(Choice::new("stay", "a")),
    );
    let mut session = Session::new(graph, SessionConfig::default());
    session.start().unwrap();

    assert_eq!(
        session.choose(0).unwrap_err(),
        StoryError::SceneNotFound(NodeId::new("missing"))
    );
    assert_eq!(session.state().current_scene, NodeId::new("a"));
    assert!(session.choose(1).is_ok());
}

/// Choice effects are applied before the target scene's entry effects.
#[test]
fn test_event_order() {
    let graph = StoryGraph::new("a")
        .with_node(
            "a",
            ChoiceNode::new("x").with_choice(
                Choice::new("trade", "b")
                    .with_effect(Effect::remove_item("Coin"))
                    .with_effect(Effect::set_flag("traded", true)),
            ),
        )
        .with_node("b", ChoiceNode::new("y").with_effect(Effect::add_item("Bread")));

    let mut state = GameState::default();
    state.add_item("Coin");
    state.add_item("Coin");
    let resolver = SceneResolver::new(&graph);
    resolver.resolve_from(&mut state, &NodeId::new("a")).unwrap();

    let resolved = resolver.choose(&mut state, 0).unwrap();

    assert_eq!(
        resolved.outcome.events,
        vec![
            StateEvent::ItemRemoved { item: "Coin".to_string(), count: 2 },
            StateEvent::FlagSet { flag: "traded".to_string(), value: true.into() },
            StateEvent::ItemAdded { item: "Bread".to_string() },
        ]
    );
    assert_eq!(state.inventory.len(), 1);
}

/// The configured fallback token is used for unset flags.
#[test]
fn test_config_fallback_token() {
    let graph = StoryGraph::new("a").with_node("a", ChoiceNode::new("Pet: {flags.pet}"));
    let config = SessionConfig::new().with_unset_flag_token("unknown");
    let mut state = GameState::new(&config, NodeId::new("a"));

    let resolved = SceneResolver::with_config(&graph, &config)
        .resolve_from(&mut state, &NodeId::new("a"))
        .unwrap();

    assert_eq!(resolved.scene().unwrap().text, "Pet: unknown");
}
