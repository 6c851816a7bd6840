// ── Domain model ──
//
// Canonical types the registry store, the config transform, and the
// console all share. Wire types from `devhub-api` never leak past `convert`.

pub mod config;
pub mod device;

pub use config::{ConfigEntry, ConfigValue, DeviceConfig};
pub use device::{Device, DeviceDraft, DeviceId, DeviceType};
