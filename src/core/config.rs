//! Session configuration.
//!
//! Hosts configure a play session at startup by providing:
//! - `SessionConfig`: starting values for a fresh `GameState`, the day
//!   names used by the clock, and the text fallback for unset flags
//! - `RevealConfig`: cadence of the incremental text reveal
//!
//! Both load from JSON; every field has a default, so `{}` is a valid config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// Configuration of the incremental text reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevealConfig {
    /// Milliseconds between two reveal ticks.
    pub tick_interval_ms: u64,

    /// Characters appended per tick. A tag span always counts as one.
    pub chars_per_tick: usize,
}

impl RevealConfig {
    /// Create a reveal configuration.
    #[must_use]
    pub fn new(tick_interval_ms: u64, chars_per_tick: usize) -> Self {
        Self {
            tick_interval_ms,
            chars_per_tick: chars_per_tick.max(1),
        }
    }

    /// Interval between ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::new(10, 1)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Name the player starts with.
    pub player_name: String,

    /// Starting day (index into `day_names`).
    pub start_day: i64,

    /// Starting clock time in minutes since midnight.
    pub start_time_minutes: i64,

    /// Day names, indexed by `dayIndex`.
    pub day_names: Vec<String>,

    /// Day label used when `dayIndex` is outside `day_names`.
    pub overflow_day_name: String,

    /// Substituted for `{flags.<name>}` when the flag is unset or falsy.
    pub unset_flag_token: String,

    /// Text reveal cadence.
    pub reveal: RevealConfig,
}

impl SessionConfig {
    /// Create a configuration with the stock defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            player_name: "Player".to_string(),
            start_day: 0,
            start_time_minutes: 8 * 60,
            day_names: [
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ]
            .iter()
            .map(|d| (*d).to_string())
            .collect(),
            overflow_day_name: "Weekend".to_string(),
            unset_flag_token: "onbekend".to_string(),
            reveal: RevealConfig::default(),
        }
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the starting player name.
    #[must_use]
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }

    /// Set the starting day and time.
    #[must_use]
    pub fn with_start_clock(mut self, day: i64, time_minutes: i64) -> Self {
        self.start_day = day;
        self.start_time_minutes = time_minutes;
        self
    }

    /// Set the fallback token for unset flags.
    #[must_use]
    pub fn with_unset_flag_token(mut self, token: impl Into<String>) -> Self {
        self.unset_flag_token = token.into();
        self
    }

    /// Set the reveal cadence.
    #[must_use]
    pub fn with_reveal(mut self, reveal: RevealConfig) -> Self {
        self.reveal = reveal;
        self
    }

    /// Name of a day, or the overflow label.
    #[must_use]
    pub fn day_name(&self, day_index: i64) -> &str {
        usize::try_from(day_index)
            .ok()
            .and_then(|i| self.day_names.get(i))
            .map_or(self.overflow_day_name.as_str(), String::as_str)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
