//! Core types: node ids, game state, session configuration.
//!
//! These are shared by every other module. The state is owned by the host;
//! the interpreter only ever borrows it.

pub mod ids;
pub mod config;
pub mod state;

pub use ids::NodeId;
pub use config::{RevealConfig, SessionConfig};
pub use state::{FlagValue, GameState, StateField};
