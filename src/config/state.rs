// Application state module
// Bundles the config and the route table shared by every connection

use std::sync::atomic::AtomicBool;

use super::types::Config;
use crate::routing::Router;

/// Application state. Built once at start-up, shared read-only across
/// requests; nothing in here is mutated per request.
pub struct AppState {
    pub config: Config,
    pub router: Router,

    // Cached config value for fast access without locks
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, router: Router) -> Self {
        let cached_access_log = AtomicBool::new(config.logging.access_log);
        Self {
            config,
            router,
            cached_access_log,
        }
    }
}
