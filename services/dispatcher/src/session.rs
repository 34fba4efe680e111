//! Worker session: the server-side state for one connected worker, and the
//! reader-loop/writer-gate pair that lets a single persistent TCP
//! connection carry server-initiated REQUEST frames and worker-initiated
//! REG/HEARTBEAT frames without interleaving bytes between them.
//!
//! Shaped after the teacher's `ws_forwarder_handler` (`services/server/src
//! /ws_forwarder.rs`): one task owns the read side and drives a dispatch
//! loop on message kind, while writes go out through a single serialized
//! path. The difference here is the transport (raw framed TCP instead of
//! an Axum `WebSocket`) and the addition of an explicit writer mutex, since
//! `WebSocket::send` isn't `Send`-shareable the way a plain `AsyncWrite`
//! half is.

use crate::pending::{PendingOutcome, PendingTable};
use crate::routing::RoutingTable;
use dispatch_protocol::{read_frame, tag, write_frame, CodecError, Frame, RegPayload};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One connected worker, for the lifetime of its TCP connection.
pub struct WorkerSession {
    pub id: Uuid,
    client_id: StdMutex<Option<String>>,
    writer: AsyncMutex<Box<dyn AsyncWrite + Unpin + Send>>,
    /// Request ids this session currently owes a response for. Tracked here
    /// (rather than scanned out of the pending table) so teardown can fail
    /// exactly the right slots in O(k) without the pending table needing to
    /// know anything about sessions.
    in_flight: StdMutex<HashSet<i32>>,
    registered: std::sync::atomic::AtomicBool,
}

impl WorkerSession {
    fn new(writer: Box<dyn AsyncWrite + Unpin + Send>) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            client_id: StdMutex::new(None),
            writer: AsyncMutex::new(writer),
            in_flight: StdMutex::new(HashSet::new()),
            registered: std::sync::atomic::AtomicBool::new(false),
        })
    }

    pub fn client_id(&self) -> Option<String> {
        self.client_id.lock().unwrap().clone()
    }

    fn set_client_id(&self, id: String) {
        *self.client_id.lock().unwrap() = Some(id);
    }

    /// Serialized write: acquires the write gate, encodes, writes. Every
    /// producer — the HTTP front door dispatching a REQUEST, and the
    /// reader loop itself replying to REG/HEARTBEAT — goes through this
    /// one method, so frames from different producers can never interleave
    /// on the wire.
    pub async fn write_frame(&self, frame: &Frame) -> Result<(), CodecError> {
        let mut writer = self.writer.lock().await;
        write_frame(&mut *writer, frame).await
    }

    /// Record that `request_id` is now awaiting a response from this
    /// session. Called by the HTTP front door just before writing the
    /// REQUEST frame.
    pub fn track_request(&self, request_id: i32) {
        self.in_flight.lock().unwrap().insert(request_id);
    }

    /// Stop tracking `request_id` — the HTTP side is done waiting on it,
    /// one way or another (fulfilled, timed out, or already torn down).
    pub fn untrack_request(&self, request_id: i32) {
        self.in_flight.lock().unwrap().remove(&request_id);
    }

    fn drain_in_flight(&self) -> Vec<i32> {
        self.in_flight.lock().unwrap().drain().collect()
    }
}

/// Reject multi-segment REG paths per spec §9's recommendation: the source
/// never defines behavior for them, and silently stripping to the first
/// segment at registration time (rather than only at lookup time) would
/// let a worker claim `/a` while believing it registered `/a/b`.
fn is_single_segment(path: &str) -> bool {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    !trimmed.is_empty() && !trimmed.contains('/')
}

/// Accept one worker connection: send WELCOME, then run the reader loop
/// until EOF or a framing error, then tear down. Spawned as its own task
/// per connection by the TCP accept loop in [`crate::tcp`].
pub async fn run_session<S>(
    stream: S,
    routing: Arc<RoutingTable>,
    pending: Arc<PendingTable>,
    max_frame_bytes: u32,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let session = WorkerSession::new(Box::new(writer));

    if session.write_frame(&Frame::welcome("welcome to the dispatcher")).await.is_err() {
        warn!(session_id = %session.id, "failed to send WELCOME, dropping connection");
        return;
    }

    loop {
        let frame = match read_frame(&mut reader, max_frame_bytes).await {
            Ok(frame) => frame,
            Err(CodecError::Eof) => {
                debug!(session_id = %session.id, "worker closed connection");
                break;
            }
            Err(e) => {
                warn!(session_id = %session.id, error = %e, "framing error, tearing down session");
                break;
            }
        };

        if let Err(e) = handle_frame(&session, &routing, &pending, frame).await {
            warn!(session_id = %session.id, error = %e, "fatal error handling frame, tearing down session");
            break;
        }
    }

    teardown(&session, &routing, &pending).await;
}

enum SessionError {
    DuplicateRegistration,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::DuplicateRegistration => write!(f, "duplicate REG on one connection"),
        }
    }
}

async fn handle_frame(
    session: &Arc<WorkerSession>,
    routing: &Arc<RoutingTable>,
    pending: &Arc<PendingTable>,
    frame: Frame,
) -> Result<(), SessionError> {
    match frame.sub.as_str() {
        tag::REG => {
            if session.registered.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(SessionError::DuplicateRegistration);
            }
            let payload: RegPayload = match serde_json::from_slice(&frame.msg) {
                Ok(p) => p,
                Err(e) => {
                    // Malformed payload does not consume the worker's one
                    // REG attempt — the REG_RESPONSE error string is an
                    // invitation to retry on the same connection, not a
                    // prelude to teardown, so `registered` stays false.
                    warn!(session_id = %session.id, error = %e, "malformed REG payload");
                    let _ = session
                        .write_frame(&Frame::reg_response(format!("malformed REG payload: {e}")))
                        .await;
                    return Ok(());
                }
            };
            session.registered.store(true, std::sync::atomic::Ordering::SeqCst);
            let (valid, invalid): (Vec<String>, Vec<String>) =
                payload.paths.into_iter().partition(|p| is_single_segment(p));
            if !invalid.is_empty() {
                warn!(session_id = %session.id, ?invalid, "rejecting multi-segment REG paths");
            }
            session.set_client_id(payload.client_id.clone());
            routing.install(Arc::clone(session), &valid).await;
            info!(session_id = %session.id, client_id = %payload.client_id, paths = ?valid, "worker registered");
            let _ = session
                .write_frame(&Frame::reg_response(format!(
                    "registered {} path(s)",
                    valid.len()
                )))
                .await;
        }
        tag::RESPONSE => {
            pending.fulfill(frame.request, PendingOutcome::ok(frame.msg));
        }
        tag::ERROR => {
            let body = serde_json::from_slice::<dispatch_protocol::ErrorPayload>(&frame.msg)
                .map(|p| p.error.into_bytes())
                .unwrap_or_else(|_| b"error".to_vec());
            pending.fulfill(frame.request, PendingOutcome::worker_error(body));
        }
        tag::HEARTBEAT => {
            let _ = session.write_frame(&Frame::heartbeat_response(frame.msg)).await;
        }
        other => {
            debug!(session_id = %session.id, sub = %other, "ignoring unknown frame tag");
        }
    }
    Ok(())
}

async fn teardown(session: &Arc<WorkerSession>, routing: &Arc<RoutingTable>, pending: &Arc<PendingTable>) {
    routing.unregister(session.id).await;
    let orphaned = session.drain_in_flight();
    if !orphaned.is_empty() {
        warn!(session_id = %session.id, count = orphaned.len(), "failing in-flight requests, worker disconnected");
    }
    pending.fulfill_all_disconnected(&orphaned);
    info!(session_id = %session.id, client_id = ?session.client_id(), "session torn down");
}

/// Test-only helpers for constructing a [`WorkerSession`] without a real
/// socket, used by the routing-table unit tests.
#[cfg(test)]
pub mod test_support {
    use super::WorkerSession;
    use std::sync::Arc;

    pub fn dummy_session() -> Arc<WorkerSession> {
        WorkerSession::new(Box::new(tokio::io::sink()))
    }
}
