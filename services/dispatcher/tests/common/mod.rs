use dispatcher::config::DispatcherConfig;
use dispatcher::state::AppState;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Binds both of the dispatcher's listeners on OS-assigned ports and spawns
/// the accept loop and HTTP server as background tasks, the way the
/// teacher's integration tests spawn `axum::serve` against a `127.0.0.1:0`
/// listener (`services/server/tests/http_streams.rs::make_server`).
pub async fn start_dispatcher(request_timeout: Duration) -> (SocketAddr, SocketAddr) {
    let tcp_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let tcp_addr = tcp_listener.local_addr().unwrap();
    let http_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let http_addr = http_listener.local_addr().unwrap();

    let config = DispatcherConfig {
        host: "127.0.0.1".to_owned(),
        http_port: http_addr.port(),
        tcp_port: tcp_addr.port(),
        request_timeout,
        max_frame_bytes: dispatch_protocol::DEFAULT_MAX_FRAME_BYTES,
    };
    let state = AppState::new(config);

    let accept_state = state.clone();
    tokio::spawn(async move {
        dispatcher::tcp::accept_loop(tcp_listener, accept_state).await;
    });

    let router = dispatcher::http::build_router(state);
    tokio::spawn(async move {
        axum::serve(http_listener, router).await.unwrap();
    });

    (http_addr, tcp_addr)
}

pub fn base_url(addr: SocketAddr) -> String {
    format!("http://{addr}")
}
