//! Scene resolution - following automatic transitions until the player is
//! needed.
//!
//! Resolution starts at a node id and walks logic nodes until it reaches an
//! interactive scene (`choice` or `input`) or an ending. Logic nodes are
//! tracked per pass, so a cycle among them is reported instead of looping.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, instrument, trace};

use rustc_hash::FxHashSet;

use crate::conditions::ConditionEvaluator;
use crate::core::{GameState, NodeId, SessionConfig, StateField};
use crate::effects::{Effect, EffectExecutor, EffectOutcome};
use crate::error::{Branch, SceneKind, StoryError};
use crate::graph::{
    Choice, ChoiceNode, InputNode, Node, SceneInfo, StoryGraph, DEFAULT_DEATH_MESSAGE,
    DEFAULT_WIN_MESSAGE,
};
use crate::text::TextResolver;

/// Choice target that ends the session in death when no such node exists.
pub const DEATH_TARGET: &str = "death";

/// Choice target that ends the session in victory when no such node exists.
pub const WIN_TARGET: &str = "win";

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    Death,
    Win,
}

/// A choice the player can currently see.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleChoice {
    /// Index into the node's full choice list, as passed to `choose`.
    pub index: usize,
    /// Label with variables substituted.
    pub text: String,
}

/// An interactive scene, ready to present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: NodeId,
    pub kind: SceneKind,
    /// Resolved and substituted text, possibly containing markup.
    pub text: String,
    /// Visible choices, in authored order.
    pub choices: Vec<VisibleChoice>,
    /// True when the scene has no authored choices but a direct `next`.
    pub can_advance: bool,
    /// Where an input scene stores its value.
    pub variable: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

/// Where resolution stopped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The player needs to act.
    Interactive(Scene),
    /// The session is over.
    Terminal { ending: Ending, message: String },
    /// An effect asked for the session to be reset.
    Restart,
}

/// Result of a resolution or player action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    pub resolution: Resolution,
    /// State changes made on the way, in order.
    pub outcome: EffectOutcome,
    /// Logic nodes passed through, in order.
    pub path: SmallVec<[NodeId; 4]>,
}

impl Resolved {
    fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            outcome: EffectOutcome::default(),
            path: SmallVec::new(),
        }
    }

    /// The interactive scene, if resolution stopped at one.
    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        match &self.resolution {
            Resolution::Interactive(scene) => Some(scene),
            _ => None,
        }
    }

    /// The ending, if the session is over.
    #[must_use]
    pub fn ending(&self) -> Option<Ending> {
        match &self.resolution {
            Resolution::Terminal { ending, .. } => Some(*ending),
            _ => None,
        }
    }

    /// True if the session ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.resolution, Resolution::Terminal { .. })
    }

    /// True if an effect asked for a reset.
    #[must_use]
    pub fn restart_requested(&self) -> bool {
        matches!(self.resolution, Resolution::Restart)
    }

    fn with_path(mut self, path: SmallVec<[NodeId; 4]>) -> Self {
        self.path = path;
        self
    }

    fn with_prior(mut self, prior: EffectOutcome) -> Self {
        let mut outcome = prior;
        outcome.merge(self.outcome);
        self.outcome = outcome;
        self
    }
}

/// Resolves scenes and applies player actions against one graph.
///
/// The resolver borrows the graph and never mutates it. Game state is
/// passed in for every call; [`GameState::current_scene`] is written only
/// here, on entry to an interactive scene.
pub struct SceneResolver<'g> {
    graph: &'g StoryGraph,
    text: TextResolver,
}

impl<'g> SceneResolver<'g> {
    /// Create a resolver with default text settings.
    pub fn new(graph: &'g StoryGraph) -> Self {
        Self {
            graph,
            text: TextResolver::default(),
        }
    }

    /// Create a resolver using a session configuration.
    pub fn with_config(graph: &'g StoryGraph, config: &SessionConfig) -> Self {
        Self {
            graph,
            text: TextResolver::from_config(config),
        }
    }

    /// The graph being played.
    #[must_use]
    pub fn graph(&self) -> &'g StoryGraph {
        self.graph
    }

    /// The text resolver used for scene text.
    #[must_use]
    pub fn text(&self) -> &TextResolver {
        &self.text
    }

    /// Follow automatic transitions from `node_id`.
    ///
    /// Interactive scenes are entered: `currentScene` is set, `timeSet` is
    /// applied, then entry effects, then the text and visible choices are
    /// resolved against the updated state.
    #[instrument(level = "debug", skip(self, state, node_id), fields(from = %node_id))]
    pub fn resolve_from(
        &self,
        state: &mut GameState,
        node_id: &NodeId,
    ) -> Result<Resolved, StoryError> {
        let mut visited: FxHashSet<&NodeId> = FxHashSet::default();
        let mut path: SmallVec<[NodeId; 4]> = SmallVec::new();
        let mut current = node_id;

        loop {
            let (id, node) = self
                .graph
                .nodes
                .get_key_value(current.as_str())
                .ok_or_else(|| StoryError::SceneNotFound(current.clone()))?;

            match node {
                Node::Logic(logic) => {
                    path.push(id.clone());
                    if !visited.insert(id) {
                        return Err(StoryError::LogicCycleDetected {
                            node: id.clone(),
                            path: path.into_vec(),
                        });
                    }

                    let holds = ConditionEvaluator::check(logic.condition.as_ref(), state);
                    let (branch, target) = if holds {
                        (Branch::True, logic.next_true.as_ref())
                    } else {
                        (Branch::False, logic.next_false.as_ref())
                    };
                    trace!(node = %id, %branch, "logic branch");

                    current = target.ok_or_else(|| StoryError::DanglingLogicBranch {
                        node: id.clone(),
                        branch,
                    })?;
                }

                Node::Death(end) => {
                    let message = message_or(end.message.as_deref(), DEFAULT_DEATH_MESSAGE);
                    return Ok(self.terminal(Ending::Death, message, state).with_path(path));
                }

                Node::Win(end) => {
                    let message = message_or(end.message.as_deref(), DEFAULT_WIN_MESSAGE);
                    return Ok(self.terminal(Ending::Win, message, state).with_path(path));
                }

                Node::Choice(scene) => {
                    let resolved = self.enter(state, id, &scene.scene, |state| {
                        self.choice_scene(id, scene, state)
                    });
                    return Ok(resolved.with_path(path));
                }

                Node::Input(scene) => {
                    let resolved = self.enter(state, id, &scene.scene, |state| {
                        self.input_scene(id, scene, state)
                    });
                    return Ok(resolved.with_path(path));
                }
            }
        }
    }

    /// Rebuild the view of the current scene without entering it again.
    ///
    /// Neither `timeSet` nor entry effects are applied and the state is
    /// left untouched. The current scene must be a choice or input node.
    pub fn view(&self, state: &GameState) -> Result<Resolved, StoryError> {
        let id = &state.current_scene;
        let scene = match self.current_node(state)? {
            Node::Choice(scene) => self.choice_scene(id, scene, state),
            Node::Input(scene) => self.input_scene(id, scene, state),
            _ => {
                return Err(StoryError::WrongSceneKind {
                    node: id.clone(),
                    expected: SceneKind::Choice,
                })
            }
        };
        Ok(Resolved::new(Resolution::Interactive(scene)))
    }

    /// Pick a choice in the current scene.
    ///
    /// The choice must exist and be visible. Its effects are applied, then
    /// its `timeCost`, then its target is resolved.
    #[instrument(level = "debug", skip(self, state), fields(scene = %state.current_scene))]
    pub fn choose(&self, state: &mut GameState, index: usize) -> Result<Resolved, StoryError> {
        let scene_id = state.current_scene.clone();
        let Node::Choice(scene) = self.current_node(state)? else {
            return Err(StoryError::WrongSceneKind {
                node: scene_id,
                expected: SceneKind::Choice,
            });
        };

        let choice = scene
            .choices
            .get(index)
            .filter(|c| ConditionEvaluator::check(c.condition.as_ref(), state))
            .ok_or_else(|| StoryError::ChoiceUnavailable {
                node: scene_id.clone(),
                index,
            })?;

        debug!(index, next = ?choice.next, "choice taken");
        self.follow_choice(state, &scene_id, choice)
    }

    /// Follow the direct `next` of a choice scene without choices.
    ///
    /// `death` and `win` end the session here just as they do for choices.
    #[instrument(level = "debug", skip(self, state), fields(scene = %state.current_scene))]
    pub fn advance(&self, state: &mut GameState) -> Result<Resolved, StoryError> {
        let scene_id = state.current_scene.clone();
        let Node::Choice(scene) = self.current_node(state)? else {
            return Err(StoryError::WrongSceneKind {
                node: scene_id,
                expected: SceneKind::Choice,
            });
        };

        if !scene.choices.is_empty() {
            return Err(StoryError::MissingTarget(scene_id));
        }

        self.follow(state, &scene_id, scene.next.as_ref(), None)
    }

    /// Store player input for the current input scene and move on.
    ///
    /// The text is trimmed and must not be empty. It is stored in
    /// `flags.<name>`, a fixed state field, or an extra field, depending on
    /// the scene's `variable`; without one it becomes the player name.
    #[instrument(level = "debug", skip(self, state, input), fields(scene = %state.current_scene))]
    pub fn submit_input(&self, state: &mut GameState, input: &str) -> Result<Resolved, StoryError> {
        let scene_id = state.current_scene.clone();
        let Node::Input(scene) = self.current_node(state)? else {
            return Err(StoryError::WrongSceneKind {
                node: scene_id,
                expected: SceneKind::Input,
            });
        };

        let value = input.trim();
        if value.is_empty() {
            return Err(StoryError::EmptyInput);
        }

        let outcome = store_input(state, scene.variable.as_deref(), value);
        Ok(self
            .follow(state, &scene_id, scene.next.as_ref(), None)?
            .with_prior(outcome))
    }

    // === Internals ===

    fn current_node(&self, state: &GameState) -> Result<&'g Node, StoryError> {
        self.graph
            .node(state.current_scene.as_str())
            .ok_or_else(|| StoryError::SceneNotFound(state.current_scene.clone()))
    }

    fn enter<F>(&self, state: &mut GameState, id: &NodeId, info: &SceneInfo, build: F) -> Resolved
    where
        F: FnOnce(&GameState) -> Scene,
    {
        state.current_scene = id.clone();
        if let Some(minutes) = info.time_set {
            state.time_minutes = minutes;
        }

        let outcome = EffectExecutor::apply(&info.effects, state);
        if outcome.restart {
            debug!(scene = %id, "entry effects requested restart");
            return Resolved {
                outcome,
                ..Resolved::new(Resolution::Restart)
            };
        }

        debug!(scene = %id, "entered scene");
        Resolved {
            outcome,
            ..Resolved::new(Resolution::Interactive(build(state)))
        }
    }

    fn choice_scene(&self, id: &NodeId, scene: &ChoiceNode, state: &GameState) -> Scene {
        Scene {
            id: id.clone(),
            kind: SceneKind::Choice,
            text: self.text.resolve(&scene.text, state),
            choices: self.visible_choices(&scene.choices, state),
            can_advance: scene.choices.is_empty() && scene.next.is_some(),
            variable: None,
            location: scene.scene.location.clone(),
            image: scene.scene.image.clone(),
        }
    }

    fn input_scene(&self, id: &NodeId, scene: &InputNode, state: &GameState) -> Scene {
        Scene {
            id: id.clone(),
            kind: SceneKind::Input,
            text: self.text.resolve(&scene.text, state),
            choices: Vec::new(),
            can_advance: false,
            variable: scene.variable.clone(),
            location: scene.scene.location.clone(),
            image: scene.scene.image.clone(),
        }
    }

    fn terminal(&self, ending: Ending, message: &str, state: &GameState) -> Resolved {
        debug!(?ending, "session ended");
        Resolved::new(Resolution::Terminal {
            ending,
            message: self.text.substitute(message, state),
        })
    }

    fn visible_choices(&self, choices: &[Choice], state: &GameState) -> Vec<VisibleChoice> {
        choices
            .iter()
            .enumerate()
            .filter(|(_, c)| ConditionEvaluator::check(c.condition.as_ref(), state))
            .map(|(index, c)| VisibleChoice {
                index,
                text: self.text.substitute(&c.text, state),
            })
            .collect()
    }

    fn follow_choice(
        &self,
        state: &mut GameState,
        scene_id: &NodeId,
        choice: &Choice,
    ) -> Result<Resolved, StoryError> {
        let outcome = EffectExecutor::apply(&choice.effects, state);
        if outcome.restart {
            return Ok(Resolved {
                outcome,
                ..Resolved::new(Resolution::Restart)
            });
        }

        if let Some(minutes) = choice.time_cost {
            state.advance_time(minutes);
        }

        Ok(self
            .follow(state, scene_id, choice.next.as_ref(), Some(choice))?
            .with_prior(outcome))
    }

    /// Resolve an outgoing link of `scene_id`.
    ///
    /// `death` and `win` end the session when no node has that id. The
    /// choice taken, if any, supplies the ending message.
    fn follow(
        &self,
        state: &mut GameState,
        scene_id: &NodeId,
        next: Option<&NodeId>,
        choice: Option<&Choice>,
    ) -> Result<Resolved, StoryError> {
        let next = next.ok_or_else(|| StoryError::MissingTarget(scene_id.clone()))?;

        if !self.graph.contains(next.as_str()) {
            let ending = match next.as_str() {
                DEATH_TARGET => Some((
                    Ending::Death,
                    choice.and_then(|c| c.death_message.as_deref()),
                    DEFAULT_DEATH_MESSAGE,
                )),
                WIN_TARGET => Some((
                    Ending::Win,
                    choice.and_then(|c| c.win_message.as_deref()),
                    DEFAULT_WIN_MESSAGE,
                )),
                _ => None,
            };
            if let Some((ending, message, fallback)) = ending {
                return Ok(self.terminal(ending, message_or(message, fallback), state));
            }
        }

        self.resolve_from(state, next)
    }
}

/// An authored ending message, or the default when unset or empty.
fn message_or<'a>(message: Option<&'a str>, default: &'a str) -> &'a str {
    message.filter(|m| !m.is_empty()).unwrap_or(default)
}

/// Write a trimmed input value where the scene's `variable` points.
fn store_input(state: &mut GameState, variable: Option<&str>, value: &str) -> EffectOutcome {
    let Some(variable) = variable.filter(|v| !v.is_empty()) else {
        return EffectExecutor::apply(&[Effect::set_field(StateField::PlayerName, value)], state);
    };

    if let Some(path) = variable.strip_prefix("flags.") {
        let flag = path.split('.').next().unwrap_or(path);
        return EffectExecutor::apply(&[Effect::set_flag(flag, value)], state);
    }

    if StateField::from_name(variable).is_some() {
        return EffectExecutor::apply(&[Effect::set_value(variable, value)], state);
    }

    state.fields.insert(variable.to_string(), value.to_string());
    EffectOutcome::default()
}

/// Resolve from `node_id` with default text settings.
pub fn resolve_from(
    graph: &StoryGraph,
    state: &mut GameState,
    node_id: &NodeId,
) -> Result<Resolved, StoryError> {
    SceneResolver::new(graph).resolve_from(state, node_id)
}
