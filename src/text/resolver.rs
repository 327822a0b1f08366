//! Text variant selection and variable substitution.

use serde::{Deserialize, Serialize};

use crate::conditions::{Condition, ConditionEvaluator};
use crate::core::{GameState, SessionConfig};

/// One candidate text in a conditional text list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextVariant {
    /// Text shown when this variant is picked.
    #[serde(default)]
    pub content: String,

    /// Guard; absent means "always".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl TextVariant {
    /// An unconditional variant.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            condition: None,
        }
    }

    /// A guarded variant.
    pub fn when(content: impl Into<String>, condition: Condition) -> Self {
        Self {
            content: content.into(),
            condition: Some(condition),
        }
    }
}

/// Scene text: either a plain string or an ordered list of variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextEntry {
    Plain(String),
    Variants(Vec<TextVariant>),
}

impl Default for TextEntry {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for TextEntry {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for TextEntry {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

impl From<Vec<TextVariant>> for TextEntry {
    fn from(variants: Vec<TextVariant>) -> Self {
        Self::Variants(variants)
    }
}

/// Resolves scene text against the current state.
#[derive(Clone, Debug)]
pub struct TextResolver {
    unset_flag_token: String,
}

impl TextResolver {
    /// Create a resolver with the given fallback for unset flags.
    pub fn new(unset_flag_token: impl Into<String>) -> Self {
        Self {
            unset_flag_token: unset_flag_token.into(),
        }
    }

    /// Create a resolver from a session configuration.
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.unset_flag_token.clone())
    }

    /// Pick the text to show and substitute variables into it.
    ///
    /// For a variant list the first variant whose condition holds wins;
    /// later variants are not evaluated. No match yields `""`.
    #[must_use]
    pub fn resolve(&self, entry: &TextEntry, state: &GameState) -> String {
        match entry {
            TextEntry::Plain(text) => self.substitute(text, state),
            TextEntry::Variants(variants) => variants
                .iter()
                .find(|v| ConditionEvaluator::check(v.condition.as_ref(), state))
                .map(|v| self.substitute(&v.content, state))
                .unwrap_or_default(),
        }
    }

    /// Expand `{...}` tokens in one left-to-right pass.
    ///
    /// Substituted values are copied verbatim and never rescanned, so a
    /// player name containing `{time}` stays as typed.
    #[must_use]
    pub fn substitute(&self, text: &str, state: &GameState) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let expanded = after
                .find('}')
                .and_then(|close| self.expand(&after[..close], state).map(|v| (close, v)));

            match expanded {
                Some((close, value)) => {
                    out.push_str(&value);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Expand a single token body. `None` leaves the token verbatim.
    fn expand(&self, token: &str, state: &GameState) -> Option<String> {
        if token == "player" {
            return Some(state.player_name.clone());
        }
        if token == "time" {
            return Some(state.time_string());
        }
        if let Some(flag) = token.strip_prefix("flags.") {
            if !is_word(flag) {
                return None;
            }
            return Some(match state.flag(flag) {
                Some(value) if value.is_truthy() => value.to_string(),
                _ => self.unset_flag_token.clone(),
            });
        }
        if is_word(token) {
            return state.field_text(token);
        }
        None
    }
}

impl Default for TextResolver {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
