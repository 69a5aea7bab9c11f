//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Default request body limit (10 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Server configuration.
///
/// Configuration values can be set via environment variables (a `.env` file
/// in the working directory is loaded first):
/// - `DATAMODEL_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `DATAMODEL_PORT`: The port to listen on (default: 13020)
/// - `DATAMODEL_BODY_LIMIT_BYTES`: Maximum request body size (default: 10 MiB)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub body_limit_bytes: usize,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DATAMODEL_PORT` or `DATAMODEL_BODY_LIMIT_BYTES`
    /// is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let host = std::env::var("DATAMODEL_HOST").unwrap_or(defaults.host);

        let port = std::env::var("DATAMODEL_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("DATAMODEL_PORT must be a valid port number")?
            .unwrap_or(defaults.port);

        let body_limit_bytes = std::env::var("DATAMODEL_BODY_LIMIT_BYTES")
            .ok()
            .map(|b| b.parse::<usize>())
            .transpose()
            .context("DATAMODEL_BODY_LIMIT_BYTES must be a byte count")?
            .unwrap_or(defaults.body_limit_bytes);

        Ok(Self {
            host,
            port,
            body_limit_bytes,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 13020,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}
