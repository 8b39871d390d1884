//! Transport configuration

use crate::config::ConfigError;
use std::time::Duration;

const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where and how to reach the legal-analysis backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Base URL without trailing slash, e.g. `http://localhost:8000`
    pub base_url: String,
    /// `None` means no client-side timeout
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl TransportConfig {
    pub(crate) fn from_vars(base_url: Option<String>, timeout: Option<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(base_url));
        }

        let secs = match timeout {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let timeout = (secs > 0).then(|| Duration::from_secs(secs));

        Ok(Self { base_url, timeout })
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/", self.base_url)
    }
}
