//! `POST /register` — the side-channel handshake a worker calls before
//! dialing the TCP port. Per spec §4.5 this is intentional redundancy: it
//! does not touch the routing table (that only happens when the REG frame
//! arrives over TCP) and exists purely to hand the worker the TCP port to
//! dial.

use crate::http::response::bad_request;
use crate::state::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dispatch_protocol::{RegisterRequest, RegisterResponse};

pub async fn register(
    State(state): State<AppState>,
    body: axum::body::Bytes,
) -> Response {
    let request: RegisterRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => return bad_request(format!("malformed register request: {e}")),
    };
    if request.client_id.trim().is_empty() {
        return bad_request("client_id must not be empty");
    }

    Json(RegisterResponse {
        client_id: request.client_id,
        paths: request.paths,
        tcp_port: state.config.tcp_port,
    })
    .into_response()
}
