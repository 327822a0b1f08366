//! Effect definitions.
//!
//! Effects are the state mutations a story can perform, attached to
//! choices (applied when picked) and to scenes (applied on entry). The
//! vocabulary is fixed; the JSON form is tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::core::{FlagValue, StateField};

/// Value carried by a `SET_VALUE` effect.
///
/// The editor writes numbers when the input parses as one and text
/// otherwise, so all scalar shapes are accepted and coerced on apply.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl SettingValue {
    /// Coerce to an integer field value. Floats truncate, numeric text parses.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Self::Float(_) => None,
            Self::Text(t) => {
                let t = t.trim();
                t.parse::<i64>().ok().or_else(|| {
                    t.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
            }
            Self::Bool(_) => None,
        }
    }

    /// Coerce to a text field value.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(t) => t.clone(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl Default for SettingValue {
    fn default() -> Self {
        Self::Integer(0)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A single state mutation.
///
/// ## Flags
/// - `SetFlag`: set a flag (default value `true`)
///
/// ## Inventory
/// - `AddItem`: append an item
/// - `RemoveItem`: remove every copy of an item
///
/// ## Fields
/// - `SetValue`: set `dayIndex`, `timeMinutes` or `playerName`; any other
///   property name is ignored
///
/// ## Session
/// - `Restart`: ask the host to reset the session; stops the batch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    SetFlag {
        flag: String,
        #[serde(default)]
        value: FlagValue,
    },

    AddItem {
        item: String,
    },

    RemoveItem {
        item: String,
    },

    SetValue {
        property: String,
        #[serde(default)]
        value: SettingValue,
    },

    Restart,

    /// Any `type` this interpreter does not know.
    #[serde(other)]
    Unknown,
}

impl Effect {
    /// Set a flag.
    pub fn set_flag(flag: impl Into<String>, value: impl Into<FlagValue>) -> Self {
        Self::SetFlag {
            flag: flag.into(),
            value: value.into(),
        }
    }

    /// Add an item.
    pub fn add_item(item: impl Into<String>) -> Self {
        Self::AddItem { item: item.into() }
    }

    /// Remove an item.
    pub fn remove_item(item: impl Into<String>) -> Self {
        Self::RemoveItem { item: item.into() }
    }

    /// Set a state field by name.
    pub fn set_value(property: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        Self::SetValue {
            property: property.into(),
            value: value.into(),
        }
    }

    /// Set a whitelisted state field.
    pub fn set_field(field: StateField, value: impl Into<SettingValue>) -> Self {
        Self::set_value(field.name(), value)
    }

    /// True for effects that touch the inventory.
    #[must_use]
    pub fn touches_inventory(&self) -> bool {
        matches!(self, Self::AddItem { .. } | Self::RemoveItem { .. })
    }
}
