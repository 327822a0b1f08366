//! # story-graph
//!
//! An interpreter for branching narratives stored as a directed graph of
//! scenes.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven**: Stories are plain JSON written by an authoring
//!    editor. The condition and effect vocabularies are fixed; there is no
//!    scripting language.
//!
//! 2. **Permissive Play, Strict Inspection**: Unknown condition or effect
//!    types never stop a session. They get a safe default at runtime and a
//!    finding from the validator.
//!
//! 3. **Host Owns Everything Outside**: No files, timers, threads or
//!    rendering. State is passed in by `&mut`; text reveal is ticked by the
//!    host's loop.
//!
//! ## Architecture
//!
//! - **Scene Resolution**: logic nodes are followed automatically with a
//!   per-pass visited set, so a logic cycle is an error rather than a hang.
//!
//! - **Persistent Data Structures**: the inventory is an `im` vector, so
//!   cloning a `GameState` for a snapshot is cheap.
//!
//! ## Modules
//!
//! - `core`: node ids, game state, session configuration
//! - `conditions`: condition trees and their evaluation
//! - `effects`: state mutations and change events
//! - `text`: text variants and `{...}` substitution
//! - `graph`: nodes, choices, the story graph and its JSON form
//! - `scene`: scene resolution, player actions, play sessions
//! - `validate`: reachability, dead-end and link checks
//! - `reveal`: tick-driven incremental text reveal
//! - `error`: error types

pub mod core;
pub mod conditions;
pub mod effects;
pub mod text;
pub mod graph;
pub mod scene;
pub mod validate;
pub mod reveal;
pub mod error;

// Re-export commonly used types
pub use crate::core::{FlagValue, GameState, NodeId, RevealConfig, SessionConfig, StateField};

pub use crate::conditions::{Condition, ConditionEvaluator};

pub use crate::effects::{Effect, EffectExecutor, EffectOutcome, SettingValue, StateEvent};

pub use crate::text::{TextEntry, TextResolver, TextVariant};

pub use crate::graph::{Choice, ChoiceNode, InputNode, LogicNode, Node, StoryGraph, TerminalNode};

pub use crate::scene::{
    resolve_from, Ending, Resolution, Resolved, Scene, SceneResolver, Session, VisibleChoice,
};

pub use crate::validate::{validate, Finding, FindingKind, ValidationReport};

pub use crate::reveal::{RevealEngine, RevealHandle, RevealState};

pub use crate::error::{Branch, LoadError, SceneKind, StoryError};
