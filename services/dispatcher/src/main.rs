use dispatcher::config;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());
    tracing_subscriber::fmt().with_env_filter(EnvFilter::new(log_level)).init();

    let cfg = match env::var("DISPATCHER_CONFIG") {
        Ok(path) => config::load_config_from_path(std::path::Path::new(&path)),
        Err(_) => config::load_config(),
    }
    .unwrap_or_else(|e| panic!("failed to load dispatcher config: {e}"));

    info!(?cfg, "starting dispatcher");
    dispatcher::run(cfg, shutdown_signal()).await.expect("dispatcher exited with an error");
}

/// Waits for SIGTERM or Ctrl-C (SIGINT) and returns to trigger graceful
/// shutdown of the HTTP listener. The TCP accept loop is aborted directly
/// once the HTTP server has drained, per spec §4.6: shutdown is "closing
/// listeners and letting sessions terminate via EOF", nothing fancier.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("received Ctrl+C, shutting down"); },
        _ = terminate => { info!("received SIGTERM, shutting down"); },
    }
}
