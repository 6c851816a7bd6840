// ── Device registry ──
//
// The single owner of the local device list and the only component that
// issues create/update/delete calls. Mutations apply an optimistic local
// step, then schedule a background full reload that converges the list to
// the server's state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use devhub_api::{ApiClient, DevicePayload, HttpTransport, Transport};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::convert;
use crate::error::CoreError;
use crate::model::{Device, DeviceDraft, DeviceId};
use crate::store::{DeviceList, Reconciler, Snapshot};
use crate::stream::DeviceStream;

/// Cheaply cloneable handle to the device registry.
///
/// Mutations return the server's record as soon as the server accepts
/// them. The follow-up reload runs in the background; await
/// [`settled()`](Self::settled) to observe its result.
pub struct DeviceRegistry<T: Transport = HttpTransport> {
    inner: Arc<RegistryInner<T>>,
}

struct RegistryInner<T: Transport> {
    client: ApiClient<T>,
    devices: DeviceList,
    reconciler: Reconciler,
}

impl<T: Transport> Clone for DeviceRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> DeviceRegistry<T> {
    /// Create an empty registry. Nothing is fetched until
    /// [`load_all()`](Self::load_all) is called.
    pub fn new(client: ApiClient<T>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                client,
                devices: DeviceList::new(),
                reconciler: Reconciler::new(),
            }),
        }
    }

    pub fn client(&self) -> &ApiClient<T> {
        &self.inner.client
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the full registry and replace the local list with it.
    ///
    /// Supersedes any background reload still in flight. On failure the
    /// local list is left as it was. If a mutation schedules a newer
    /// reload while this one is in flight, the fetched list is returned but
    /// not applied.
    pub async fn load_all(&self) -> Result<Vec<Device>, CoreError> {
        let (generation, _) = self.inner.reconciler.begin();
        let _finish = self.inner.reconciler.finish_on_drop(generation);

        let devices = self.fetch_all().await?;
        if !self.apply_reload(generation, devices.clone()) {
            debug!(generation, "listing superseded by a newer reload");
        }
        Ok(devices)
    }

    /// Fetch one device from the server and upsert it locally.
    pub async fn get(&self, id: &DeviceId) -> Result<Device, CoreError> {
        let raw = self.inner.client.get_device(&id.to_string()).await?;
        let device = Device::try_from(raw)?;
        self.inner.devices.push_or_replace(device.clone());
        Ok(device)
    }

    /// The current local list.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.devices.snapshot()
    }

    /// Look up a device in the local list.
    pub fn device(&self, id: &DeviceId) -> Option<Arc<Device>> {
        self.inner.devices.get(id)
    }

    pub fn subscribe(&self) -> DeviceStream {
        DeviceStream::new(self.inner.devices.subscribe())
    }

    /// When the last full listing was applied, if ever.
    pub fn last_reload(&self) -> Option<DateTime<Utc>> {
        self.inner.devices.last_reload()
    }

    /// Resolve once the most recently requested reload has finished,
    /// whether it was applied, failed or was superseded.
    pub async fn settled(&self) {
        self.inner.reconciler.settled().await;
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a device. The server assigns the id.
    pub async fn create(&self, draft: &DeviceDraft) -> Result<Device, CoreError> {
        let raw = self
            .inner
            .client
            .create_device(&DevicePayload::from(draft))
            .await?;
        let device = self.accepted(Device::try_from(raw))?;
        info!(id = %device.id, name = %device.name, "device created");

        self.reconcile_with(|list| {
            list.push_or_replace(device.clone());
        });
        Ok(device)
    }

    /// Replace the device at `id` with `draft` (full payload).
    pub async fn update(&self, id: &DeviceId, draft: &DeviceDraft) -> Result<Device, CoreError> {
        let raw = self
            .inner
            .client
            .update_device(&id.to_string(), &DevicePayload::from(draft))
            .await?;
        let device = self.accepted(Device::try_from(raw))?;
        info!(id = %device.id, name = %device.name, "device updated");

        self.reconcile_with(|list| {
            if !list.replace_by_id(device.clone()) {
                debug!(id = %device.id, "updated device not in local list");
            }
        });
        Ok(device)
    }

    pub async fn delete(&self, id: &DeviceId) -> Result<(), CoreError> {
        self.inner.client.delete_device(&id.to_string()).await?;
        info!(%id, "device deleted");

        self.reconcile_with(|list| {
            list.remove_by_id(id);
        });
        Ok(())
    }

    // ── Reconciliation ───────────────────────────────────────────────

    async fn fetch_all(&self) -> Result<Vec<Device>, CoreError> {
        convert::devices(self.inner.client.list_devices().await?)
    }

    fn apply_reload(&self, generation: u64, devices: Vec<Device>) -> bool {
        let reconciler = &self.inner.reconciler;
        self.inner
            .devices
            .replace_all_if(devices, || reconciler.is_current(generation))
    }

    /// Start a new reload generation, apply the optimistic step, then
    /// fetch in the background.
    fn reconcile_with(&self, optimistic: impl FnOnce(&DeviceList)) {
        let (generation, cancel) = self.inner.reconciler.begin();
        optimistic(&self.inner.devices);
        tokio::spawn(reload_task(self.clone(), generation, cancel));
    }

    /// The server accepted a mutation but its record could not be read:
    /// still reconcile so the list picks the change up.
    fn accepted(&self, device: Result<Device, CoreError>) -> Result<Device, CoreError> {
        device.inspect_err(|_| self.reconcile_with(|_| {}))
    }
}

// ── Background task ──────────────────────────────────────────────────

async fn reload_task<T: Transport>(
    registry: DeviceRegistry<T>,
    generation: u64,
    cancel: CancellationToken,
) {
    let _finish = registry.inner.reconciler.finish_on_drop(generation);

    tokio::select! {
        biased;
        () = cancel.cancelled() => debug!(generation, "reload superseded"),
        result = registry.fetch_all() => match result {
            Ok(devices) => {
                if registry.apply_reload(generation, devices) {
                    debug!(generation, "reload applied");
                } else {
                    debug!(generation, "stale reload discarded");
                }
            }
            Err(e) => warn!(generation, error = %e, "background reload failed"),
        },
    }
}
