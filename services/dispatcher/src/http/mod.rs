pub mod clients;
pub mod proxy;
pub mod register;
pub mod response;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the front-door router. `/`, `/register`, `/clients`, `/healthz`
/// are fixed routes; every other path falls through to [`proxy::proxy`],
/// which resolves it against the routing table at request time.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(proxy::root))
        .route("/register", post(register::register))
        .route("/clients", get(clients::clients))
        .route("/healthz", get(clients::healthz))
        .fallback(proxy::proxy)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
