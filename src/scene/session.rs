//! Host-facing play session.
//!
//! A [`Session`] owns one graph, one state, one configuration and one
//! reveal engine, and keeps track of where play currently stands. It is
//! the smallest thing a front end needs to run a story.

use tracing::{info, warn};

use crate::core::{GameState, SessionConfig};
use crate::error::{LoadError, StoryError};
use crate::graph::StoryGraph;
use crate::reveal::{RevealEngine, RevealHandle};

use super::{Resolution, Resolved, SceneResolver};

/// One play-through of a story.
#[derive(Debug)]
pub struct Session {
    graph: StoryGraph,
    config: SessionConfig,
    state: GameState,
    reveal: RevealEngine,
    current: Option<Resolved>,
}

impl Session {
    /// Create a session. Nothing is resolved until [`start`](Self::start).
    #[must_use]
    pub fn new(graph: StoryGraph, config: SessionConfig) -> Self {
        let state = GameState::new(&config, graph.start_node.clone());
        let reveal = RevealEngine::new(config.reveal.clone());
        Self {
            graph,
            config,
            state,
            reveal,
            current: None,
        }
    }

    /// Reset the state and resolve the start node.
    pub fn start(&mut self) -> Result<&Resolved, StoryError> {
        info!(start = %self.graph.start_node, "session start");
        self.state = GameState::new(&self.config, self.graph.start_node.clone());
        if let Some(handle) = self.reveal.current() {
            self.reveal.cancel(handle);
        }

        let resolved = SceneResolver::with_config(&self.graph, &self.config)
            .resolve_from(&mut self.state, &self.graph.start_node)?;
        // A restart requested by the start scene itself is handed to the host
        Ok(self.current.insert(resolved))
    }

    /// Pick a visible choice in the current scene.
    ///
    /// Fails with [`StoryError::SessionOver`] once an ending was reached,
    /// as do [`advance`](Self::advance) and [`submit_input`](Self::submit_input).
    pub fn choose(&mut self, index: usize) -> Result<&Resolved, StoryError> {
        self.ensure_playing()?;
        let resolved =
            SceneResolver::with_config(&self.graph, &self.config).choose(&mut self.state, index)?;
        self.settle(resolved)
    }

    /// Continue a scene that has no choices.
    pub fn advance(&mut self) -> Result<&Resolved, StoryError> {
        self.ensure_playing()?;
        let resolved =
            SceneResolver::with_config(&self.graph, &self.config).advance(&mut self.state)?;
        self.settle(resolved)
    }

    /// Submit text to the current input scene.
    pub fn submit_input(&mut self, input: &str) -> Result<&Resolved, StoryError> {
        self.ensure_playing()?;
        let resolved =
            SceneResolver::with_config(&self.graph, &self.config).submit_input(&mut self.state, input)?;
        self.settle(resolved)
    }

    /// Start revealing the current scene's text or ending message.
    ///
    /// Returns `None` when nothing has been resolved yet.
    pub fn reveal_current(
        &mut self,
        on_tick: impl FnMut(&str) + 'static,
        on_done: impl FnOnce() + 'static,
    ) -> Option<RevealHandle> {
        let text = match &self.current.as_ref()?.resolution {
            Resolution::Interactive(scene) => scene.text.clone(),
            Resolution::Terminal { message, .. } => message.clone(),
            Resolution::Restart => return None,
        };
        Some(self.reveal.start(text, on_tick, on_done))
    }

    // === Snapshots ===

    /// Encode the current state.
    pub fn snapshot(&self) -> Result<Vec<u8>, LoadError> {
        self.state.to_snapshot()
    }

    /// Replace the state with a snapshot and show its current scene.
    ///
    /// The scene is not entered again, so the restored state is exactly the
    /// saved one. On error the session is left unchanged.
    pub fn restore(&mut self, bytes: &[u8]) -> Result<&Resolved, RestoreError> {
        let state = GameState::from_snapshot(bytes)?;
        let resolved = SceneResolver::with_config(&self.graph, &self.config).view(&state)?;
        self.state = state;
        Ok(self.current.insert(resolved))
    }

    // === Accessors ===

    /// The story being played.
    #[must_use]
    pub fn graph(&self) -> &StoryGraph {
        &self.graph
    }

    /// Session settings.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The last resolution, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Resolved> {
        self.current.as_ref()
    }

    /// True once an ending was reached.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.current.as_ref().is_some_and(Resolved::is_terminal)
    }

    /// Status line such as `"Mo 08:00"`.
    #[must_use]
    pub fn clock_label(&self) -> String {
        self.state.clock_label(&self.config)
    }

    /// The reveal engine, for ticking from the host loop.
    pub fn reveal_mut(&mut self) -> &mut RevealEngine {
        &mut self.reveal
    }

    // === Internals ===

    fn ensure_playing(&self) -> Result<(), StoryError> {
        if self.is_over() {
            return Err(StoryError::SessionOver);
        }
        Ok(())
    }

    /// Store a resolution, restarting first if one was requested.
    fn settle(&mut self, resolved: Resolved) -> Result<&Resolved, StoryError> {
        if resolved.restart_requested() {
            warn!("story requested restart");
            return self.start();
        }
        Ok(self.current.insert(resolved))
    }
}

/// Errors from [`Session::restore`].
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Story(#[from] StoryError),
}
