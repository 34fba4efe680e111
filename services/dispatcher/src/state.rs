use crate::config::DispatcherConfig;
use crate::pending::PendingTable;
use crate::routing::RoutingTable;
use std::sync::Arc;

/// Shared, explicitly-constructed handles passed into the HTTP front door
/// and the TCP accept loop. Per spec §9, these are value objects behind
/// mutexes — not ambient globals — so more than one dispatcher instance can
/// exist in a process (e.g. one per integration test).
#[derive(Clone)]
pub struct AppState {
    pub routing: Arc<RoutingTable>,
    pub pending: Arc<PendingTable>,
    pub config: Arc<DispatcherConfig>,
}

impl AppState {
    pub fn new(config: DispatcherConfig) -> Self {
        Self {
            routing: Arc::new(RoutingTable::new()),
            pending: Arc::new(PendingTable::new()),
            config: Arc::new(config),
        }
    }
}
