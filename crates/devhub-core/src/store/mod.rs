// ── Device registry storage ──

mod device_list;
mod reconcile;

pub use device_list::Snapshot;
pub(crate) use device_list::DeviceList;
pub(crate) use reconcile::Reconciler;
