// ── Device domain types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::DeviceConfig;

// ── DeviceId ────────────────────────────────────────────────────────

/// Server-assigned device identifier.
///
/// Opaque to the client: some backends hand out integers, others strings.
/// Never reassigned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for DeviceId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

/// Typed input: numeric only when the text is the canonical form of an
/// integer, so `"5"` matches a server's `5` while `"007"` stays text.
impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Numeric(n),
            _ => Self::Text(s.to_owned()),
        }
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Numeric(n),
            _ => Self::Text(s),
        }
    }
}

// ── DeviceType ──────────────────────────────────────────────────────

/// Kind of managed device.
///
/// The console only creates the three known kinds; `Other` carries any
/// value the server reports outside that set so it survives an update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceType {
    Thermostat,
    Light,
    Camera,
    Other(String),
}

impl DeviceType {
    /// The kinds offered when creating a device.
    pub const KNOWN: [Self; 3] = [Self::Thermostat, Self::Light, Self::Camera];

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Thermostat => "thermostat",
            Self::Light => "light",
            Self::Camera => "camera",
            Self::Other(s) => s,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        match self {
            Self::Thermostat => "Thermostat",
            Self::Light => "Light",
            Self::Camera => "Security Camera",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for DeviceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "thermostat" => Self::Thermostat,
            "light" => Self::Light,
            "camera" => Self::Camera,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for DeviceType {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<DeviceType> for String {
    fn from(t: DeviceType) -> Self {
        match t {
            DeviceType::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

// ── Device ──────────────────────────────────────────────────────────

/// A device record as the registry knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub config: DeviceConfig,
}

/// The full payload of a create or update. There are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub config: DeviceConfig,
}

impl DeviceDraft {
    pub fn new(name: impl Into<String>, device_type: DeviceType) -> Self {
        Self {
            name: name.into(),
            device_type,
            config: DeviceConfig::new(),
        }
    }

    pub fn with_config(mut self, config: DeviceConfig) -> Self {
        self.config = config;
        self
    }
}

/// Seed an editor from an existing record (name and type carried over).
impl From<&Device> for DeviceDraft {
    fn from(d: &Device) -> Self {
        Self {
            name: d.name.clone(),
            device_type: d.device_type.clone(),
            config: d.config.clone(),
        }
    }
}
