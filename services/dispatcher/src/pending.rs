//! Pending-request table: the rendezvous primitive between an inbound HTTP
//! handler and the asynchronous RESPONSE/ERROR frame that eventually answers
//! it.
//!
//! Generalizes the teacher's one-off `ForwarderCommand` oneshot-per-RPC
//! pattern (`services/server/src/state.rs::ForwarderCommand`,
//! `http/forwarder_config.rs`) into a single table keyed by `request_id`,
//! since every dispatcher request follows the same shape: allocate a slot,
//! write a REQUEST frame, await the slot with a deadline.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

/// The eventual outcome of a dispatched request, as seen by the HTTP side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOutcome {
    pub status: u16,
    pub body: Vec<u8>,
}

impl PendingOutcome {
    pub fn ok(body: Vec<u8>) -> Self {
        Self { status: 200, body }
    }

    pub fn worker_error(body: Vec<u8>) -> Self {
        Self { status: 500, body }
    }

    pub fn worker_disconnected() -> Self {
        Self { status: 502, body: b"worker disconnected".to_vec() }
    }
}

/// A rendezvous slot handed back from [`PendingTable::allocate`]: the
/// `request_id` to stamp on the REQUEST frame, plus the receiving half of
/// the oneshot the HTTP handler awaits.
pub struct PendingSlot {
    pub request_id: i32,
    pub ready: oneshot::Receiver<PendingOutcome>,
}

/// Process-wide table of in-flight requests, guarded by a single mutex.
/// Critical sections are O(1) map operations, matching §4.4 of the fabric
/// design: contention here is never the bottleneck.
pub struct PendingTable {
    next_id: AtomicI32,
    slots: Mutex<HashMap<i32, oneshot::Sender<PendingOutcome>>>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self { next_id: AtomicI32::new(1), slots: Mutex::new(HashMap::new()) }
    }

    /// Allocate a fresh, 32-bit wrapping request id and insert its slot.
    /// The counter wraps silently past `i32::MAX` per the spec: this is a
    /// documented property, not a bug, since a collision would require
    /// ~2^31 requests still in flight at once.
    pub fn allocate(&self) -> PendingSlot {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.slots.lock().unwrap().insert(request_id, tx);
        PendingSlot { request_id, ready: rx }
    }

    /// Fulfill a slot with a successful response. No-op if the slot is
    /// already gone (timed out, or already fulfilled).
    pub fn fulfill(&self, request_id: i32, outcome: PendingOutcome) {
        if let Some(tx) = self.slots.lock().unwrap().remove(&request_id) {
            let _ = tx.send(outcome);
        }
    }

    /// Remove a slot without fulfilling it, returning whether it was still
    /// present. Used by the HTTP side on timeout: a late RESPONSE racing
    /// against this call will find the slot gone and become a silent no-op
    /// fulfill.
    pub fn abandon(&self, request_id: i32) -> bool {
        self.slots.lock().unwrap().remove(&request_id).is_some()
    }

    /// Fulfill every slot currently pointing at a dead worker session with
    /// a 502, used by session teardown. Takes explicit ids rather than
    /// scanning, since the caller (the routing table) already knows which
    /// requests were in flight to that session would require cross-table
    /// bookkeeping this design intentionally avoids — see
    /// [`crate::session::WorkerSession`] for how in-flight ids are tracked
    /// per session instead.
    pub fn fulfill_all_disconnected(&self, request_ids: &[i32]) {
        for &id in request_ids {
            self.fulfill(id, PendingOutcome::worker_disconnected());
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }
}

impl Default for PendingTable {
    fn default() -> Self {
        Self::new()
    }
}
