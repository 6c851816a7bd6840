// ── Reactive device list ──
//
// Ordered device storage with push-based change notification via a
// `watch` channel. Every mutation rebuilds the snapshot subscribers see.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{Device, DeviceId};

/// Shared, immutable view of the list at one point in time.
pub type Snapshot = Arc<Vec<Arc<Device>>>;

/// The local device list.
///
/// Invariant: at most one entry per `DeviceId`. Order is the server's
/// listing order, with optimistic creations appended at the end.
pub(crate) struct DeviceList {
    snapshot: watch::Sender<Snapshot>,
    /// When the last full reload was applied.
    last_reload: watch::Sender<Option<DateTime<Utc>>>,
}

impl DeviceList {
    pub(crate) fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (last_reload, _) = watch::channel(None);
        Self {
            snapshot,
            last_reload,
        }
    }

    /// Replace the whole list with a fresh server listing, but only if
    /// `is_current` still holds once the list is locked.
    ///
    /// Subscribers are only notified when the contents actually differ.
    /// Returns `true` if the listing was applied.
    pub(crate) fn replace_all_if(
        &self,
        devices: Vec<Device>,
        is_current: impl FnOnce() -> bool,
    ) -> bool {
        let mut applied = false;
        self.snapshot.send_if_modified(|snap| {
            if !is_current() {
                return false;
            }
            applied = true;
            let unchanged = snap.len() == devices.len()
                && snap.iter().zip(&devices).all(|(old, new)| **old == *new);
            if unchanged {
                return false;
            }
            *snap = Arc::new(devices.into_iter().map(Arc::new).collect());
            true
        });
        if applied {
            self.last_reload.send_replace(Some(Utc::now()));
        }
        applied
    }

    /// Append `device`, or replace the entry that already carries its id.
    /// Returns `true` if the id was new.
    pub(crate) fn push_or_replace(&self, device: Device) -> bool {
        let mut is_new = false;
        self.snapshot.send_modify(|snap| {
            let mut list = snap.as_ref().clone();
            match list.iter().position(|d| d.id == device.id) {
                Some(idx) => list[idx] = Arc::new(device),
                None => {
                    is_new = true;
                    list.push(Arc::new(device));
                }
            }
            *snap = Arc::new(list);
        });
        is_new
    }

    /// Replace the entry with the same id in place. Returns `false` (and
    /// leaves the list untouched) if no entry carries that id.
    pub(crate) fn replace_by_id(&self, device: Device) -> bool {
        self.snapshot.send_if_modified(|snap| {
            let Some(idx) = snap.iter().position(|d| d.id == device.id) else {
                return false;
            };
            let mut list = snap.as_ref().clone();
            list[idx] = Arc::new(device);
            *snap = Arc::new(list);
            true
        })
    }

    /// Remove the entry with `id`, returning it if it existed.
    pub(crate) fn remove_by_id(&self, id: &DeviceId) -> Option<Arc<Device>> {
        let mut removed = None;
        self.snapshot.send_if_modified(|snap| {
            let Some(idx) = snap.iter().position(|d| d.id == *id) else {
                return false;
            };
            let mut list = snap.as_ref().clone();
            removed = Some(list.remove(idx));
            *snap = Arc::new(list);
            true
        });
        removed
    }

    pub(crate) fn get(&self, id: &DeviceId) -> Option<Arc<Device>> {
        self.snapshot.borrow().iter().find(|d| d.id == *id).cloned()
    }

    /// Current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub(crate) fn last_reload(&self) -> Option<DateTime<Utc>> {
        *self.last_reload.borrow()
    }
}
