// ── Delete confirmation ──
//
// Two-state machine guarding destructive deletes. A single held id, not a
// queue: a second request while one is pending is refused.

use devhub_api::Transport;
use tracing::debug;

use crate::error::CoreError;
use crate::model::DeviceId;
use crate::registry::DeviceRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfirmState {
    #[default]
    Idle,
    ConfirmPending {
        id: DeviceId,
    },
}

#[derive(Debug, Default)]
pub struct DeleteConfirmation {
    state: ConfirmState,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// The id awaiting confirmation, if any.
    pub fn pending(&self) -> Option<&DeviceId> {
        match &self.state {
            ConfirmState::ConfirmPending { id } => Some(id),
            ConfirmState::Idle => None,
        }
    }

    /// `Idle -> ConfirmPending`. Fails if a delete is already pending.
    pub fn request(&mut self, id: DeviceId) -> Result<(), CoreError> {
        if let ConfirmState::ConfirmPending { id: held } = &self.state {
            return Err(CoreError::ConfirmationPending { id: held.clone() });
        }
        debug!(%id, "delete awaiting confirmation");
        self.state = ConfirmState::ConfirmPending { id };
        Ok(())
    }

    /// `ConfirmPending -> Idle` with no side effect. Returns the dropped id.
    pub fn cancel(&mut self) -> Option<DeviceId> {
        match std::mem::take(&mut self.state) {
            ConfirmState::ConfirmPending { id } => {
                debug!(%id, "delete cancelled");
                Some(id)
            }
            ConfirmState::Idle => None,
        }
    }

    /// `ConfirmPending -> Idle`, deleting the held id through `registry`.
    ///
    /// The state is `Idle` afterwards whether or not the delete succeeded.
    pub async fn confirm<T: Transport>(
        &mut self,
        registry: &DeviceRegistry<T>,
    ) -> Result<DeviceId, CoreError> {
        let ConfirmState::ConfirmPending { id } = std::mem::take(&mut self.state) else {
            return Err(CoreError::NothingToConfirm);
        };
        registry.delete(&id).await?;
        Ok(id)
    }
}
