// ── API-to-domain type conversions ──
//
// Bridges raw `devhub_api` wire types into canonical `devhub_core::model`
// types, and domain drafts back into request payloads.

use devhub_api::{DevicePayload, DeviceResponse};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::{ConfigValue, Device, DeviceConfig, DeviceDraft, DeviceId, DeviceType};

// ── Ids ─────────────────────────────────────────────────────────────

fn device_id(raw: Value) -> Result<DeviceId, CoreError> {
    match raw {
        Value::Number(n) => Ok(n
            .as_i64()
            .map_or_else(|| DeviceId::Text(n.to_string()), DeviceId::Numeric)),
        // Server text ids are kept verbatim.
        Value::String(s) if !s.is_empty() => Ok(DeviceId::Text(s)),
        other => Err(CoreError::Internal(format!(
            "device record has an unusable id: {other}"
        ))),
    }
}

// ── Config values ───────────────────────────────────────────────────

/// Scalars map one-to-one; `null` reads as empty text and nested JSON is
/// kept as its textual form.
fn config_value(raw: Value) -> ConfigValue {
    match raw {
        Value::Bool(b) => ConfigValue::Bool(b),
        Value::Number(n) => ConfigValue::Number(n),
        Value::String(s) => ConfigValue::Text(s),
        Value::Null => ConfigValue::empty(),
        nested @ (Value::Array(_) | Value::Object(_)) => ConfigValue::Text(nested.to_string()),
    }
}

fn config_json(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Bool(b) => Value::Bool(*b),
        ConfigValue::Number(n) => Value::Number(n.clone()),
        ConfigValue::Text(s) => Value::String(s.clone()),
    }
}

// ── Device ──────────────────────────────────────────────────────────

impl TryFrom<DeviceResponse> for Device {
    type Error = CoreError;

    fn try_from(raw: DeviceResponse) -> Result<Self, Self::Error> {
        let config: DeviceConfig = raw
            .config
            .into_iter()
            .map(|(k, v)| (k, config_value(v)))
            .collect();

        Ok(Self {
            id: device_id(raw.id)?,
            name: raw.name,
            device_type: DeviceType::from(raw.device_type),
            config,
        })
    }
}

/// Convert a list response, failing on the first unusable record.
pub(crate) fn devices(raw: Vec<DeviceResponse>) -> Result<Vec<Device>, CoreError> {
    raw.into_iter().map(Device::try_from).collect()
}

impl From<&DeviceDraft> for DevicePayload {
    fn from(draft: &DeviceDraft) -> Self {
        let config: Map<String, Value> = draft
            .config
            .iter()
            .map(|(k, v)| (k.clone(), config_json(v)))
            .collect();

        Self {
            name: draft.name.clone(),
            device_type: draft.device_type.as_str().to_owned(),
            config,
        }
    }
}
