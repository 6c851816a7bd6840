// devhub-core: Device registry store and config editing between devhub-api and the console.

pub mod auth;
pub mod config;
pub mod confirm;
pub mod convert;
pub mod error;
pub mod model;
pub mod registry;
pub mod store;
pub mod stream;
pub mod transform;

#[cfg(test)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification};
pub use confirm::{ConfirmState, DeleteConfirmation};
pub use error::CoreError;
pub use registry::DeviceRegistry;
pub use store::Snapshot;
pub use stream::DeviceStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{ConfigEntry, ConfigValue, Device, DeviceConfig, DeviceDraft, DeviceId, DeviceType};

// The request layer, for callers that build clients or sessions directly.
pub use devhub_api::{ApiClient, DEFAULT_BASE_URL, HttpTransport, Session, Transport};
