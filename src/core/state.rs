//! Game state: everything a play session tracks about the player.
//!
//! ## GameState
//!
//! - Flags (named booleans or strings set by effects and input scenes)
//! - Inventory (item names in acquisition order, duplicates allowed)
//! - Clock (day index, minutes since midnight)
//! - Player name and the current scene
//!
//! The state is owned by the host session and passed explicitly into the
//! resolver and effect executor. It never lives in a global.
//!
//! ## Snapshots
//!
//! The inventory is an `im::Vector`, so cloning a state is cheap. For
//! save/restore the state also round-trips through a compact binary form.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::config::SessionConfig;
use super::ids::NodeId;
use crate::error::LoadError;

/// Value stored under a flag.
///
/// Effects write booleans; input scenes write the text the player entered.
/// In JSON a flag is a bare `true` or `"text"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FlagValue {
    /// A boolean fact.
    Bool(bool),
    /// Text, usually entered by the player.
    Text(String),
}

impl FlagValue {
    /// Truthiness used by conditions: `true`, or non-empty text.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(t) => !t.is_empty(),
        }
    }
}

impl Default for FlagValue {
    fn default() -> Self {
        Self::Bool(true)
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// Tagged form used by non-self-describing formats (bincode).
#[derive(Serialize, Deserialize)]
enum FlagRepr {
    Bool(bool),
    Text(String),
}

impl Serialize for FlagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            match self {
                Self::Bool(b) => serializer.serialize_bool(*b),
                Self::Text(t) => serializer.serialize_str(t),
            }
        } else {
            match self {
                Self::Bool(b) => FlagRepr::Bool(*b),
                Self::Text(t) => FlagRepr::Text(t.clone()),
            }
            .serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for FlagValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(FlagVisitor)
        } else {
            Ok(match FlagRepr::deserialize(deserializer)? {
                FlagRepr::Bool(b) => Self::Bool(b),
                FlagRepr::Text(t) => Self::Text(t),
            })
        }
    }
}

struct FlagVisitor;

impl Visitor<'_> for FlagVisitor {
    type Value = FlagValue;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a boolean or a string")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<FlagValue, E> {
        Ok(FlagValue::Bool(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FlagValue, E> {
        Ok(FlagValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<FlagValue, E> {
        Ok(FlagValue::Text(v))
    }

    // Hand-edited stories sometimes store numbers in flags.
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FlagValue, E> {
        Ok(FlagValue::Text(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FlagValue, E> {
        Ok(FlagValue::Text(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<FlagValue, E> {
        Ok(FlagValue::Text(v.to_string()))
    }

    // `null` clears the flag.
    fn visit_unit<E: de::Error>(self) -> Result<FlagValue, E> {
        Ok(FlagValue::Bool(false))
    }

    fn visit_none<E: de::Error>(self) -> Result<FlagValue, E> {
        Ok(FlagValue::Bool(false))
    }
}

/// The fixed state fields that effects may write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StateField {
    DayIndex,
    TimeMinutes,
    PlayerName,
}

impl StateField {
    /// Look up a field by its JSON name. Anything off the whitelist is `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dayIndex" => Some(Self::DayIndex),
            "timeMinutes" => Some(Self::TimeMinutes),
            "playerName" => Some(Self::PlayerName),
            _ => None,
        }
    }

    /// JSON name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DayIndex => "dayIndex",
            Self::TimeMinutes => "timeMinutes",
            Self::PlayerName => "playerName",
        }
    }
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete state of one play session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Named facts.
    pub flags: FxHashMap<String, FlagValue>,

    /// Items in acquisition order.
    pub inventory: Vector<String>,

    /// Day counter, index into the configured day names.
    pub day_index: i64,

    /// Minutes since midnight of day 0. May exceed a day.
    pub time_minutes: i64,

    /// Player name, substituted for `{player}`.
    pub player_name: String,

    /// Last interactive scene entered. Only the scene resolver writes this.
    pub current_scene: NodeId,

    /// Extra text fields written by input scenes with a bare variable name.
    #[serde(default)]
    pub fields: FxHashMap<String, String>,
}

impl GameState {
    /// Create a fresh state from a configuration, positioned at `start`.
    #[must_use]
    pub fn new(config: &SessionConfig, start: NodeId) -> Self {
        Self {
            flags: FxHashMap::default(),
            inventory: Vector::new(),
            day_index: config.start_day,
            time_minutes: config.start_time_minutes,
            player_name: config.player_name.clone(),
            current_scene: start,
            fields: FxHashMap::default(),
        }
    }

    // === Flags ===

    /// Get a flag.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.flags.get(name)
    }

    /// True if the flag is set to a truthy value.
    #[must_use]
    pub fn flag_is_set(&self, name: &str) -> bool {
        self.flags.get(name).is_some_and(FlagValue::is_truthy)
    }

    /// Set a flag.
    pub fn set_flag(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        self.flags.insert(name.into(), value.into());
    }

    // === Inventory ===

    /// Check if an item is held (any count).
    #[must_use]
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    /// Number of copies of an item.
    #[must_use]
    pub fn item_count(&self, item: &str) -> usize {
        self.inventory.iter().filter(|i| *i == item).count()
    }

    /// Append an item.
    pub fn add_item(&mut self, item: impl Into<String>) {
        self.inventory.push_back(item.into());
    }

    /// Remove every copy of an item, returning how many were removed.
    pub fn remove_item(&mut self, item: &str) -> usize {
        let before = self.inventory.len();
        self.inventory.retain(|i| i != item);
        before - self.inventory.len()
    }

    // === Clock ===

    /// Clock time as zero-padded `HH:MM`, hours wrapping at 24.
    #[must_use]
    pub fn time_string(&self) -> String {
        let hours = self.time_minutes.div_euclid(60).rem_euclid(24);
        let minutes = self.time_minutes.rem_euclid(60);
        format!("{:02}:{:02}", hours, minutes)
    }

    /// Advance the clock, saturating at the `i64` bounds.
    pub fn advance_time(&mut self, minutes: i64) {
        self.time_minutes = self.time_minutes.saturating_add(minutes);
    }

    /// Short clock label such as `"Mo 08:00"`.
    #[must_use]
    pub fn clock_label(&self, config: &SessionConfig) -> String {
        let day: String = config.day_name(self.day_index).chars().take(2).collect();
        format!("{} {}", day, self.time_string())
    }

    // === Fields ===

    /// Text value of a top-level field, as used by `{<field>}` substitution.
    #[must_use]
    pub fn field_text(&self, name: &str) -> Option<String> {
        match name {
            "playerName" => Some(self.player_name.clone()),
            "dayIndex" => Some(self.day_index.to_string()),
            "timeMinutes" => Some(self.time_minutes.to_string()),
            "currentScene" => Some(self.current_scene.to_string()),
            "inventory" => Some(
                self.inventory
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => self.fields.get(name).cloned(),
        }
    }

    // === Snapshots ===

    /// Encode the state as a binary snapshot.
    pub fn to_snapshot(&self) -> Result<Vec<u8>, LoadError> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a state from a binary snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, LoadError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(&SessionConfig::default(), NodeId::default())
    }
}
