//! The HTTP front door's catch-all: routes every inbound request (other
//! than `/`, `/register`, `/clients`, `/healthz`) to the worker that
//! claimed its first path segment, over the worker's persistent TCP
//! connection, and waits for the matching RESPONSE/ERROR frame.

use crate::http::response::{bad_gateway, bad_request, gateway_timeout, internal_error, not_found};
use crate::pending::PendingOutcome;
use crate::state::AppState;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dispatch_protocol::{Frame, RequestEnvelope};
use std::collections::HashMap;
use tracing::{info, warn};

/// Mirrors the configured `max_frame_bytes` ceiling: a worker reply can be
/// at most that big, so an inbound body that size would never fit in a
/// REQUEST frame either.
pub async fn proxy(State(state): State<AppState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_owned();

    let started = tokio::time::Instant::now();
    let route_key = crate::routing::route_key(&path);
    let session = match state.routing.lookup(&path).await {
        Some(session) => session,
        None => return not_found(format!("no worker registered for {route_key}")),
    };
    let client_id = session.client_id().unwrap_or_else(|| "<unregistered>".to_owned());

    let body_bytes = match to_bytes(body, state.config.max_frame_bytes as usize).await {
        Ok(b) => b.to_vec(),
        Err(e) => return bad_request(format!("could not read request body: {e}")),
    };

    let mut headers = HashMap::with_capacity(parts.headers.len());
    for name in parts.headers.keys() {
        if let Some(value) = parts.headers.get(name).and_then(|v| v.to_str().ok()) {
            headers.insert(name.as_str().to_owned(), value.to_owned());
        }
    }

    let slot = state.pending.allocate();
    let envelope = RequestEnvelope {
        request_id: slot.request_id,
        method: method.clone(),
        path: path.clone(),
        headers,
        body: body_bytes,
    };
    let payload = match serde_json::to_vec(&envelope) {
        Ok(p) => p,
        Err(e) => {
            state.pending.abandon(slot.request_id);
            return internal_error(format!("could not encode request envelope: {e}"));
        }
    };

    session.track_request(slot.request_id);
    let frame = Frame::request(slot.request_id, payload);
    if let Err(e) = session.write_frame(&frame).await {
        session.untrack_request(slot.request_id);
        state.pending.abandon(slot.request_id);
        warn!(request_id = slot.request_id, error = %e, "failed to write REQUEST frame to worker");
        return internal_error("failed to dispatch request to worker");
    }

    let outcome = tokio::time::timeout(state.config.request_timeout, slot.ready).await;
    session.untrack_request(slot.request_id);

    let latency_ms = started.elapsed().as_millis();
    match outcome {
        Ok(Ok(PendingOutcome { status, body })) => {
            info!(
                request_id = slot.request_id, %method, route = %route_key, %client_id,
                status, latency_ms, "request dispatched"
            );
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
            (code, body).into_response()
        }
        Ok(Err(_)) => {
            // The sender was dropped without a send, which only happens if
            // the slot was abandoned out from under an in-flight await —
            // not reachable through the normal fulfill/abandon paths, but
            // treated as a worker-side failure rather than a panic.
            warn!(
                request_id = slot.request_id, %method, route = %route_key, %client_id,
                latency_ms, "pending slot dropped without a response"
            );
            bad_gateway("worker disconnected before replying")
        }
        Err(_) => {
            state.pending.abandon(slot.request_id);
            warn!(
                request_id = slot.request_id, %method, route = %route_key, %client_id,
                latency_ms, "request timed out waiting for worker"
            );
            gateway_timeout("worker did not respond in time")
        }
    }
}

/// `GET /` — a static acknowledgement that the dispatcher is up, per spec
/// §4.5 item 1. Not part of the worker-routed surface.
pub async fn root() -> impl IntoResponse {
    "reverse-tunnel dispatcher"
}
