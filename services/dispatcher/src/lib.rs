pub mod config;
pub mod http;
pub mod pending;
pub mod routing;
pub mod session;
pub mod state;
pub mod tcp;

pub use config::DispatcherConfig;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::info;

/// Bind both listeners and run the dispatcher until `shutdown` resolves.
/// Broken out of `main` so integration tests can start a dispatcher on an
/// OS-assigned port (`0`) and talk to it directly.
pub async fn run(
    config: DispatcherConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let state = AppState::new(config);
    let tcp_listener = TcpListener::bind(state.config.tcp_bind_addr()).await?;
    let http_listener = TcpListener::bind(state.config.http_bind_addr()).await?;

    info!(addr = %tcp_listener.local_addr()?, "worker TCP listener bound");
    info!(addr = %http_listener.local_addr()?, "HTTP front door bound");

    let accept_state = state.clone();
    let accept_task = tokio::spawn(async move {
        tcp::accept_loop(tcp_listener, accept_state).await;
    });

    let router = http::build_router(state);
    axum::serve(http_listener, router).with_graceful_shutdown(shutdown).await?;

    accept_task.abort();
    info!("dispatcher shut down");
    Ok(())
}
