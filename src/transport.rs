//! Transport to the legal-analysis backend
//!
//! Delivers a single query and returns the answer with its supporting
//! sources, or a classified failure.

mod config;
mod error;
mod http;

pub use config::TransportConfig;
pub use error::{TransportError, TransportErrorKind};
pub use http::HttpTransport;

use crate::conversation::SourceRef;
use async_trait::async_trait;
use std::sync::Arc;

/// A successful answer from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ChatAnswer {
    /// Markdown-formatted analysis
    pub answer: String,
    pub sources: Option<Vec<SourceRef>>,
}

impl ChatAnswer {
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: None,
        }
    }
}

/// Common interface for reaching the backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one query and wait for its answer
    async fn send_query(&self, query: &str) -> Result<ChatAnswer, TransportError>;

    /// Human-readable address of the backend, for logs
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send_query(&self, query: &str) -> Result<ChatAnswer, TransportError> {
        (**self).send_query(query).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

/// Logging wrapper for transports
pub struct LoggingTransport {
    inner: Arc<dyn Transport>,
    endpoint: String,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        let endpoint = inner.endpoint().to_string();
        Self { inner, endpoint }
    }
}

#[async_trait]
impl Transport for LoggingTransport {
    async fn send_query(&self, query: &str) -> Result<ChatAnswer, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.send_query(query).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    query_chars = query.chars().count(),
                    answer_chars = answer.answer.chars().count(),
                    sources = answer.sources.as_ref().map_or(0, Vec::len),
                    "Backend query completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.endpoint,
                    duration_ms = %duration.as_millis(),
                    kind = %e.kind,
                    error = %e.message,
                    "Backend query failed"
                );
            }
        }

        result
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
