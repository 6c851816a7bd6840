// ── Device configuration types ──
//
// A device's config is a string-keyed map of scalars. The editor works on
// an ordered list of `ConfigEntry` instead; see `crate::transform`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Configuration mapping. Keys are unique; insertion order is kept for
/// editing even though storage does not depend on it.
pub type DeviceConfig = IndexMap<String, ConfigValue>;

/// A scalar configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl ConfigValue {
    /// The value a missing editor entry stands for.
    pub fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Interpret user-typed text: `true`/`false` become booleans, JSON
    /// number literals become numbers, anything else stays text.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if raw.trim() == raw {
            if let Ok(n) = serde_json::from_str::<serde_json::Number>(raw) {
                return Self::Number(n);
            }
        }
        Self::Text(raw.to_owned())
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One editable key/value slot. Editor-only; never sent to the server.
///
/// `value` is optional because a freshly added row has none yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: Option<ConfigValue>,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// A row with a key but no value yet.
    pub fn blank(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}
