//! Raw-data batches and the slot suppliers publish them through.
//!
//! A [`Batch`] is the externally supplied mapping from entry key to opaque
//! domain record that every tick re-evaluates. Batches are replaced
//! wholesale; there are no partial or merge semantics.
//!
//! Handover is decoupled from ticking: [`BatchSlot::publish`] stages a
//! replacement under a short lock and returns immediately; the kernel takes
//! whatever is staged at the start of its next Compute phase. The running
//! tick keeps iterating the batch it already owns, so a tick sees either
//! the whole old batch or the whole new one, never a mix, and a publisher
//! is never made to wait out a Compute phase.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::types::EntryId;

/// The externally supplied entry-key → record mapping.
pub type Batch<R> = FxHashMap<EntryId, R>;

/// Cloneable publish handle for staging replacement batches.
///
/// Obtained from [`Kernel::batch_slot`](crate::kernel::Kernel::batch_slot)
/// and freely cloneable across supplier threads. Publishing twice between
/// ticks discards the first staged batch.
pub struct BatchSlot<R> {
    pending: Arc<Mutex<Option<Batch<R>>>>,
}

impl<R> BatchSlot<R> {
    pub(crate) fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Stage `batch` as the replacement the next tick will compute over.
    ///
    /// Constant-time under the slot lock; never blocks for a tick in
    /// progress.
    pub fn publish(&self, batch: Batch<R>) {
        debug!(target: "gatewave::batch", entries = batch.len(), "batch staged");
        *self.pending.lock() = Some(batch);
    }

    /// True when a staged batch is waiting to be taken.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Take the staged batch, leaving the slot empty. Called by the kernel
    /// at Compute start.
    pub(crate) fn take(&self) -> Option<Batch<R>> {
        self.pending.lock().take()
    }
}

impl<R> Clone for BatchSlot<R> {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<R> fmt::Debug for BatchSlot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchSlot")
            .field("pending", &self.is_pending())
            .finish()
    }
}
