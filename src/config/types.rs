// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// HTTP/1 keep-alive switch: 0 disables it, any other value enables it.
    /// Idle connections are bounded by `request_timeout`, not by this value.
    pub keep_alive_timeout: u64,
    /// Upper bound for serving one connection, in seconds
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}

impl PerformanceConfig {
    pub const fn keep_alive_enabled(&self) -> bool {
        self.keep_alive_timeout > 0
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Upper bound for a buffered request body, in bytes
    pub max_body_size: u64,
}

/// Cross-origin configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

/// Optional bearer token check on the processing endpoint
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub token: Option<String>,
}

impl AuthConfig {
    /// Token to enforce, if the check is switched on
    pub fn expected_token(&self) -> Option<&str> {
        if self.enabled {
            self.token.as_deref().filter(|t| !t.is_empty())
        } else {
            None
        }
    }
}

/// External placement engine invocation
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Program name (looked up on PATH) or path to the engine executable
    pub program: String,
    /// Leading arguments passed before the upload paths
    #[serde(default)]
    pub args: Vec<String>,
}
