// Configuration module entry point
// Manages application configuration and runtime state

mod state;
mod types;

use std::net::SocketAddr;

use hyper::header::HeaderValue;

// Re-export public types
pub use state::AppState;
pub use types::{AuthConfig, Config, CorsConfig, EngineConfig};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("GRIDSVC")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.request_timeout", 120)?
            .set_default("http.max_body_size", 33_554_432)? // 32MB
            .set_default("cors.allowed_origin", "*")?
            .set_default("auth.enabled", false)?
            .set_default("engine.program", "placer")?
            // Deployment-level variables take precedence over everything else
            .set_override_option("cors.allowed_origin", std::env::var("ALLOWED_ORIGIN").ok())?
            .set_override_option("auth.token", std::env::var("TOKEN").ok())?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that cannot be sent as-is on every response
    fn validate(&self) -> Result<(), config::ConfigError> {
        HeaderValue::from_str(&self.cors.allowed_origin).map_err(|e| {
            config::ConfigError::Message(format!(
                "invalid cors.allowed_origin {:?}: {e}",
                self.cors.allowed_origin
            ))
        })?;
        Ok(())
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
