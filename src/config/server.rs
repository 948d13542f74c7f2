//! Server settings read from environment variables.
//!
//! Values are loaded from the process environment (optionally populated from a
//! `.env` file). Every setting has a default so the service starts without any.

use std::env;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_STATUS_CONFIG: &str = "config.toml";

/// Runtime settings for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to
    pub bind_address: String,
    /// Path of the status seeding file
    pub status_config_path: String,
}

impl ServerConfig {
    /// Reads `BIND_ADDRESS` and `STATUS_CONFIG`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            status_config_path: env::var("STATUS_CONFIG")
                .unwrap_or_else(|_| DEFAULT_STATUS_CONFIG.to_string()),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            status_config_path: DEFAULT_STATUS_CONFIG.to_string(),
        }
    }
}
