//! Startup configuration read from the environment

use crate::transport::TransportConfig;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LEGAL_ALLY_BACKEND_URL must start with http:// or https://, got {0:?}")]
    InvalidBackendUrl(String),
    #[error("LEGAL_ALLY_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("LEGAL_ALLY_PORT must be a port number between 1 and 65535, got {0:?}")]
    InvalidPort(String),
}

/// Everything the binary needs before it starts serving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub transport: TransportConfig,
    /// Port the HTTP bridge listens on
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var("LEGAL_ALLY_BACKEND_URL").ok(),
            std::env::var("LEGAL_ALLY_TIMEOUT_SECS").ok(),
            std::env::var("LEGAL_ALLY_PORT").ok(),
        )
    }

    fn from_vars(
        backend_url: Option<String>,
        timeout: Option<String>,
        port: Option<String>,
    ) -> Result<Self, ConfigError> {
        let transport = TransportConfig::from_vars(backend_url, timeout)?;
        let port = match port {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(raw)),
            },
            None => DEFAULT_PORT,
        };

        Ok(Self { transport, port })
    }
}
