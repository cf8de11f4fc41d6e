// Application state module
// Holds configuration and the shared engine handle

use super::types::Config;
use crate::engine::EngineLoader;

/// Application state
pub struct AppState {
    pub config: Config,

    // Process-wide engine, created on first use
    pub engine: EngineLoader,
}

impl AppState {
    pub fn new(config: &Config, engine: EngineLoader) -> Self {
        Self {
            config: config.clone(),
            engine,
        }
    }

    /// Whether access logging is enabled
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
