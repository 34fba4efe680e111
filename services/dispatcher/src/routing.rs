//! Path-to-worker routing table: the forward map used by the HTTP front
//! door to find a worker, and the reverse map used by session teardown to
//! clean up in O(k) rather than scanning the whole forward map.

use crate::session::WorkerSession;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-wide routing table. Held behind `Arc` and passed into the HTTP
/// front door and every worker session at construction, per the design
/// note in spec §9: an explicit value object, not an ambient global.
pub struct RoutingTable {
    inner: RwLock<Inner>,
}

struct Inner {
    forward: HashMap<String, Arc<WorkerSession>>,
    reverse: HashMap<uuid::Uuid, (Arc<WorkerSession>, HashSet<String>)>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { forward: HashMap::new(), reverse: HashMap::new() }) }
    }

    /// Install `paths` for `session`, overwriting any prior registrant for
    /// each path. Last REG wins, per spec §9: this is a deliberate policy
    /// choice carried over from the source design, not an oversight.
    pub async fn install(&self, session: Arc<WorkerSession>, paths: &[String]) {
        let mut inner = self.inner.write().await;
        for path in paths {
            if let Some(previous) = inner.forward.insert(path.clone(), Arc::clone(&session)) {
                if previous.id != session.id {
                    if let Some((_, set)) = inner.reverse.get_mut(&previous.id) {
                        set.remove(path);
                    }
                }
            }
        }
        let entry = inner
            .reverse
            .entry(session.id)
            .or_insert_with(|| (Arc::clone(&session), HashSet::new()));
        entry.1.extend(paths.iter().cloned());
    }

    /// Resolve an inbound URL path to its worker session, using only the
    /// first path segment: strip a leading `/`, take up to the next `/`,
    /// re-prepend `/`. `/stocks/IBM` and `/stocks` both resolve via the key
    /// `/stocks`.
    pub async fn lookup(&self, path: &str) -> Option<Arc<WorkerSession>> {
        let key = route_key(path);
        self.inner.read().await.forward.get(&key).cloned()
    }

    /// Remove every path this session claimed. Called from session
    /// teardown; idempotent if called more than once for the same session.
    pub async fn unregister(&self, session_id: uuid::Uuid) {
        let mut inner = self.inner.write().await;
        if let Some((_, paths)) = inner.reverse.remove(&session_id) {
            for path in paths {
                if inner.forward.get(&path).is_some_and(|s| s.id == session_id) {
                    inner.forward.remove(&path);
                }
            }
        }
    }

    /// Snapshot of every connected session's claimed paths, for `GET
    /// /clients`. Sessions that have not yet completed REG (and so own no
    /// paths) are omitted — this mirrors the spec's "active sessions and
    /// their path sets" wording, which has nothing to say about a worker
    /// still mid-handshake.
    pub async fn snapshot(&self) -> Vec<(String, Vec<String>)> {
        let inner = self.inner.read().await;
        let mut out = Vec::with_capacity(inner.reverse.len());
        for (session_id, (session, paths)) in &inner.reverse {
            if paths.is_empty() {
                continue;
            }
            let client_id = session.client_id().unwrap_or_else(|| session_id.to_string());
            let mut paths: Vec<String> = paths.iter().cloned().collect();
            paths.sort();
            out.push((client_id, paths));
        }
        out
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a leading `/`, take the substring up to the next `/`, re-prepend
/// `/`. Multi-segment registrations are rejected upstream at REG time (see
/// [`crate::session`]), so lookup only needs to defend against malformed
/// *inbound HTTP* paths, not malformed routing keys.
pub fn route_key(path: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let segment_end = trimmed.find('/').unwrap_or(trimmed.len());
    format!("/{}", &trimmed[..segment_end])
}
