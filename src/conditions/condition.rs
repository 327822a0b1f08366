//! Condition expressions.
//!
//! Conditions guard choices, text variants and logic branches. They are a
//! small boolean vocabulary over flags and inventory; the JSON form is
//! tagged by `type`:
//!
//! ```json
//! { "type": "AND", "conditions": [
//!     { "type": "HAS_ITEM", "item": "Lantern" },
//!     { "type": "NOT", "condition": { "type": "HAS_FLAG", "flag": "storm" } }
//! ] }
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

fn default_true() -> bool {
    true
}

/// Read `HAS_FLAG.value` by truthiness. `null` means the default, `true`.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    struct Truthy;

    impl Visitor<'_> for Truthy {
        type Value = bool;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("a boolean or a scalar")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
            Ok(v != 0.0 && !v.is_nan())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            Ok(!v.is_empty())
        }

        fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
            Ok(true)
        }

        fn visit_none<E: de::Error>(self) -> Result<bool, E> {
            Ok(true)
        }
    }

    deserializer.deserialize_any(Truthy)
}

fn is_true(value: &bool) -> bool {
    *value
}

/// A boolean expression over game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Condition {
    // === Primitives ===

    /// Flag truthiness must equal `value`.
    HasFlag {
        flag: String,
        #[serde(
            default = "default_true",
            deserialize_with = "lenient_bool",
            skip_serializing_if = "is_true"
        )]
        value: bool,
    },

    /// Item must be in the inventory.
    HasItem { item: String },

    // === Combinators ===

    /// All conditions must hold. Empty is true.
    And {
        #[serde(default)]
        conditions: Vec<Condition>,
    },

    /// At least one condition must hold. Empty is false.
    Or {
        #[serde(default)]
        conditions: Vec<Condition>,
    },

    /// Negation. A missing child is an authoring error.
    Not {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<Box<Condition>>,
    },

    /// Any `type` this interpreter does not know.
    #[serde(other)]
    Unknown,
}

/// Authoring problem found inside a condition tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionIssue {
    /// A `type` tag that is not part of the vocabulary.
    UnknownType,
    /// A `NOT` without a child.
    EmptyNegation,
}

impl Condition {
    /// Flag must be set (truthy).
    pub fn flag(flag: impl Into<String>) -> Self {
        Self::HasFlag {
            flag: flag.into(),
            value: true,
        }
    }

    /// Flag must be unset or falsy.
    pub fn flag_unset(flag: impl Into<String>) -> Self {
        Self::HasFlag {
            flag: flag.into(),
            value: false,
        }
    }

    /// Item must be held.
    pub fn item(item: impl Into<String>) -> Self {
        Self::HasItem { item: item.into() }
    }

    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::And {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::Or {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not {
            condition: Some(Box::new(self)),
        }
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: Condition) -> Self {
        match self {
            Self::And { mut conditions } => {
                conditions.push(other);
                Self::And { conditions }
            }
            _ => Self::all([self, other]),
        }
    }

    /// Add another condition with OR.
    #[must_use]
    pub fn or(self, other: Condition) -> Self {
        match self {
            Self::Or { mut conditions } => {
                conditions.push(other);
                Self::Or { conditions }
            }
            _ => Self::any([self, other]),
        }
    }

    /// Collect authoring problems anywhere in this tree, depth first.
    #[must_use]
    pub fn issues(&self) -> Vec<ConditionIssue> {
        let mut issues = Vec::new();
        self.collect_issues(&mut issues);
        issues
    }

    fn collect_issues(&self, issues: &mut Vec<ConditionIssue>) {
        match self {
            Self::HasFlag { .. } | Self::HasItem { .. } => {}
            Self::And { conditions } | Self::Or { conditions } => {
                for c in conditions {
                    c.collect_issues(issues);
                }
            }
            Self::Not { condition: Some(inner) } => inner.collect_issues(issues),
            Self::Not { condition: None } => issues.push(ConditionIssue::EmptyNegation),
            Self::Unknown => issues.push(ConditionIssue::UnknownType),
        }
    }
}
