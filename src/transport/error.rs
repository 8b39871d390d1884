//! Transport error types

use thiserror::Error;

/// Transport failure with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn connection_refused(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::ConnectionRefused, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::InvalidResponse, message)
    }

    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Aborted, message)
    }
}

/// Failure classification, kept for logs only. The transcript shows one
/// uniform message whatever the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Request exceeded the configured timeout
    Timeout,
    /// Backend not listening
    ConnectionRefused,
    /// Any other I/O failure while sending or reading
    Network,
    /// Backend answered with a non-success status
    ServerError,
    /// Body was not the expected JSON shape
    InvalidResponse,
    /// The awaiting task went away before an answer arrived
    Aborted,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionRefused => "connection_refused",
            Self::Network => "network",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
