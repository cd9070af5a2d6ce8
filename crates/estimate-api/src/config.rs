//! HTTP server settings from the environment.

use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Exposes internal error details in responses.
    pub debug: bool,
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
            environment: "development".to_string(),
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

impl ServerConfig {
    /// Reads APP_HOST, APP_PORT, DEBUG and ENVIRONMENT; unset or invalid values keep the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("APP_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: env::var("APP_PORT")
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.port),
            debug: env_flag("DEBUG").unwrap_or(defaults.debug),
            environment: env::var("ENVIRONMENT")
                .ok()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or(defaults.environment),
        }
    }

    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
