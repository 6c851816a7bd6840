// ── Config transform ──
//
// Converts between a device's config mapping and the ordered entry list
// an editor works on. Pure and stateless.
//
// Contract for `to_mapping`:
//   - entries with an empty key are dropped
//   - a repeated key overwrites the earlier value (last write wins; the
//     key keeps its first position)
//   - a missing value becomes an empty string
// Required-field checks belong to the caller and run before this.

use crate::model::{ConfigEntry, ConfigValue, DeviceConfig};

/// One entry per key, in the mapping's insertion order.
pub fn to_entries(config: &DeviceConfig) -> Vec<ConfigEntry> {
    config
        .iter()
        .map(|(key, value)| ConfigEntry {
            key: key.clone(),
            value: Some(value.clone()),
        })
        .collect()
}

/// Fold an entry list back into a mapping.
pub fn to_mapping(entries: &[ConfigEntry]) -> DeviceConfig {
    let mut config = DeviceConfig::with_capacity(entries.len());
    for entry in entries {
        if entry.key.is_empty() {
            continue;
        }
        let value = entry.value.clone().unwrap_or_else(ConfigValue::empty);
        config.insert(entry.key.clone(), value);
    }
    config
}

/// Set `key` to `value`: the first entry with that key is updated in
/// place, otherwise a new entry is appended.
pub fn set_entry(entries: &mut Vec<ConfigEntry>, key: &str, value: ConfigValue) {
    match entries.iter_mut().find(|e| e.key == key) {
        Some(entry) => entry.value = Some(value),
        None => entries.push(ConfigEntry {
            key: key.to_owned(),
            value: Some(value),
        }),
    }
}

/// Drop every entry with `key`. Returns `true` if anything was removed.
pub fn remove_entry(entries: &mut Vec<ConfigEntry>, key: &str) -> bool {
    let before = entries.len();
    entries.retain(|e| e.key != key);
    entries.len() != before
}
