//! `GET /clients` — a snapshot of currently active worker sessions and the
//! path prefixes each one claims.

use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use dispatch_protocol::{ClientInfo, ClientsResponse};

pub async fn clients(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.routing.snapshot().await;
    Json(ClientsResponse {
        total_clients: snapshot.len(),
        clients: snapshot
            .into_iter()
            .map(|(client_id, registered_paths)| ClientInfo { client_id, registered_paths })
            .collect(),
    })
}

pub async fn healthz() -> impl IntoResponse {
    "OK"
}
