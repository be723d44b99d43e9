// Application state module
// Immutable per-process state shared by every connection

use super::types::Config;
use crate::handler::Router;

/// Application state
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    /// Build the router from the site configuration
    pub fn new(config: Config) -> Self {
        let router = Router::from_config(&config.site);
        Self { config, router }
    }
}
