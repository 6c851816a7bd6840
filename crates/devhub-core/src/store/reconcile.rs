// ── Reload generations ──
//
// Orders full reloads. Every scheduled reload gets the next generation and
// cancels the one before it; only the newest generation may write into the
// device list.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

struct Slot {
    generation: u64,
    cancel: CancellationToken,
}

pub(crate) struct Reconciler {
    slot: Mutex<Slot>,
    /// Highest generation that has finished (applied, failed or superseded).
    finished: watch::Sender<u64>,
}

impl Reconciler {
    pub(crate) fn new() -> Self {
        let (finished, _) = watch::channel(0);
        Self {
            slot: Mutex::new(Slot {
                generation: 0,
                cancel: CancellationToken::new(),
            }),
            finished,
        }
    }

    /// Start a new generation, cancelling whatever reload was in flight.
    pub(crate) fn begin(&self) -> (u64, CancellationToken) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.cancel.cancel();
        slot.generation += 1;
        slot.cancel = CancellationToken::new();
        (slot.generation, slot.cancel.clone())
    }

    pub(crate) fn current(&self) -> u64 {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    /// Mark `generation` as done, whatever its outcome.
    pub(crate) fn finish(&self, generation: u64) {
        self.finished.send_if_modified(|done| {
            if generation > *done {
                *done = generation;
                true
            } else {
                false
            }
        });
    }

    /// Guard that marks `generation` finished when dropped, so an abandoned
    /// reload never leaves `settled()` waiting.
    pub(crate) fn finish_on_drop(&self, generation: u64) -> FinishGuard<'_> {
        FinishGuard {
            reconciler: self,
            generation,
        }
    }

    /// Wait until the generation current at call time has finished.
    pub(crate) async fn settled(&self) {
        let target = self.current();
        let mut rx = self.finished.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|done| *done >= target).await;
    }
}

pub(crate) struct FinishGuard<'a> {
    reconciler: &'a Reconciler,
    generation: u64,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.reconciler.finish(self.generation);
    }
}
