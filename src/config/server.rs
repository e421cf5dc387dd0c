//! HTTP server settings read from the environment.

use crate::errors::{Error, Result};
use std::{net::SocketAddr, time::Duration};
use tracing::info;

/// Listener, CORS and timeout settings for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the server binds to
    pub listen_addr: SocketAddr,
    /// Allowed CORS origins; `*` allows any
    pub cors_allow: Vec<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ServerConfig {
    /// Reads `LISTEN_ADDR`, `CORS_ALLOW_ORIGINS` and `REQUEST_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        let listen_addr = var_or("LISTEN_ADDR", "0.0.0.0:4000")
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid LISTEN_ADDR: {e}"),
            })?;
        let cors_allow = parse_origins(&var_or("CORS_ALLOW_ORIGINS", "*"));
        let timeout_ms: u64 = var_or("REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid REQUEST_TIMEOUT_MS: {e}"),
            })?;

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Whether any origin may call the API.
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allow.iter().any(|o| o == "*")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
        }
    }
}

pub(crate) fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
