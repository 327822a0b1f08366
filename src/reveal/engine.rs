//! The tick-driven reveal state machine.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::RevealConfig;

/// Called with the displayed prefix after every tick that revealed text.
pub type TickCallback = Box<dyn FnMut(&str)>;

/// Called once when a reveal completes or is skipped.
pub type DoneCallback = Box<dyn FnOnce()>;

/// Identifies one reveal started on an engine.
///
/// Handles from earlier reveals go stale when a new one starts; `skip` and
/// `cancel` ignore stale handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevealHandle(u64);

impl RevealHandle {
    /// Raw handle number.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Engine state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealState {
    /// Nothing started, or the last reveal was cancelled.
    #[default]
    Idle,
    /// Text is being revealed.
    Revealing,
    /// The full text is displayed.
    Done,
}

struct ActiveReveal {
    handle: RevealHandle,
    text: String,
    /// Byte offset of the revealed prefix. Always on a char boundary and
    /// never inside a `<...>` span.
    pos: usize,
    on_tick: TickCallback,
    on_done: Option<DoneCallback>,
}

impl ActiveReveal {
    /// Byte offset after one more visible step from `pos`.
    fn step(&self, pos: usize) -> usize {
        let rest = &self.text[pos..];
        match rest.chars().next() {
            None => pos,
            Some('<') => match rest.find('>') {
                Some(close) => pos + close + 1,
                // Unclosed tag: the rest is markup
                None => self.text.len(),
            },
            Some(c) => pos + c.len_utf8(),
        }
    }

    fn is_complete(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn finish(&mut self) {
        if let Some(done) = self.on_done.take() {
            done();
        }
    }
}

/// Reveals markup text a few characters per tick.
///
/// The engine owns no timer. The host calls [`tick`](Self::tick) at
/// [`tick_interval`](Self::tick_interval), or drives it with
/// [`run_to_end`](Self::run_to_end). A `<...>` span counts as one step, so
/// the displayed prefix is always well-formed up to unclosed elements.
pub struct RevealEngine {
    config: RevealConfig,
    next_handle: u64,
    state: RevealState,
    active: Option<ActiveReveal>,
    displayed: String,
}

impl RevealEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            next_handle: 0,
            state: RevealState::Idle,
            active: None,
            displayed: String::new(),
        }
    }

    /// Start revealing `text`.
    ///
    /// A reveal still in progress is cancelled; its `on_done` never runs.
    pub fn start(
        &mut self,
        text: impl Into<String>,
        on_tick: impl FnMut(&str) + 'static,
        on_done: impl FnOnce() + 'static,
    ) -> RevealHandle {
        if let Some(previous) = self.active.take() {
            trace!(handle = previous.handle.0, "reveal superseded");
        }

        self.next_handle += 1;
        let handle = RevealHandle(self.next_handle);

        self.active = Some(ActiveReveal {
            handle,
            text: text.into(),
            pos: 0,
            on_tick: Box::new(on_tick),
            on_done: Some(Box::new(on_done)),
        });
        self.state = RevealState::Revealing;
        self.displayed.clear();

        handle
    }

    /// Reveal the next `chars_per_tick` steps.
    ///
    /// Calls `on_tick` with the new prefix. When the end is reached the
    /// engine moves to `Done` and `on_done` fires. Ticking an idle or
    /// finished engine does nothing.
    pub fn tick(&mut self) -> RevealState {
        let Some(active) = self.active.as_mut() else {
            return self.state;
        };

        let before = active.pos;
        for _ in 0..self.config.chars_per_tick.max(1) {
            if active.is_complete() {
                break;
            }
            active.pos = active.step(active.pos);
        }

        if active.pos > before {
            self.displayed.clear();
            self.displayed.push_str(&active.text[..active.pos]);
            (active.on_tick)(&self.displayed);
        }

        if active.is_complete() {
            self.complete();
        }

        self.state
    }

    /// Jump to the full text.
    ///
    /// Returns `false` if `handle` is not the reveal in progress.
    pub fn skip(&mut self, handle: RevealHandle) -> bool {
        let Some(active) = self.active.as_mut().filter(|a| a.handle == handle) else {
            return false;
        };

        active.pos = active.text.len();
        self.displayed.clone_from(&active.text);
        (active.on_tick)(&self.displayed);
        self.complete();
        true
    }

    /// Stop the reveal without completing it.
    ///
    /// Neither callback fires again. Returns `false` if `handle` is not the
    /// reveal in progress, so repeated calls are harmless.
    pub fn cancel(&mut self, handle: RevealHandle) -> bool {
        if self.current() != Some(handle) {
            return false;
        }

        self.active = None;
        self.state = RevealState::Idle;
        trace!(handle = handle.0, "reveal cancelled");
        true
    }

    /// Tick until done, calling `wait` with the tick interval before each
    /// tick.
    pub fn run_to_end(&mut self, mut wait: impl FnMut(Duration)) -> RevealState {
        let interval = self.tick_interval();
        while self.state == RevealState::Revealing {
            wait(interval);
            self.tick();
        }
        self.state
    }

    fn complete(&mut self) {
        if let Some(mut active) = self.active.take() {
            self.state = RevealState::Done;
            trace!(handle = active.handle.0, "reveal done");
            active.finish();
        }
    }

    // === Accessors ===

    /// Current state.
    #[must_use]
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Text displayed so far.
    #[must_use]
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    /// Handle of the reveal in progress.
    #[must_use]
    pub fn current(&self) -> Option<RevealHandle> {
        self.active.as_ref().map(|a| a.handle)
    }

    /// How often the host should tick.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// Reveal settings.
    #[must_use]
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }
}

impl Default for RevealEngine {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl fmt::Debug for RevealEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("current", &self.current())
            .field("displayed", &self.displayed)
            .finish()
    }
}
