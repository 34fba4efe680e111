//! TCP accept loop for worker connections. Each accepted socket gets its
//! own reader task, per spec §4.6/§5 — the server never limits the number
//! of concurrently connected workers, and a hung session only ever blocks
//! that one task.

use crate::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Accept worker connections forever. Returns only if the listener itself
/// fails (e.g. the bind address was taken away from under it); individual
/// connection errors are handled per-session and never escape this loop.
pub async fn accept_loop(listener: TcpListener, state: AppState) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                info!(%peer_addr, "worker connection accepted");
                let routing = state.routing.clone();
                let pending = state.pending.clone();
                let max_frame_bytes = state.config.max_frame_bytes;
                tokio::spawn(async move {
                    crate::session::run_session(stream, routing, pending, max_frame_bytes).await;
                });
            }
            Err(e) => {
                error!(error = %e, "TCP accept failed");
            }
        }
    }
}
