//! HTTP transport for the backend's `/api/chat` endpoint

use super::{ChatAnswer, Transport, TransportConfig, TransportError};
use crate::conversation::SourceRef;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    chat_url: String,
    health_url: String,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            chat_url: config.chat_url(),
            health_url: config.health_url(),
        })
    }

    /// Probe the backend's root route
    pub async fn check_health(&self) -> Result<(), TransportError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_status(status, &body))
        }
    }
}

#[allow(clippy::needless_pass_by_value)] // Shape required by map_err
fn classify_send_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        TransportError::connection_refused(format!("Connection failed: {e}"))
    } else {
        TransportError::network(format!("Request failed: {e}"))
    }
}

fn classify_status(status: StatusCode, body: &str) -> TransportError {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .map_or_else(|| body.to_string(), |d| d.to_string());
    TransportError::server_error(format!("HTTP {status}: {detail}"))
}

fn parse_answer(body: &str) -> Result<ChatAnswer, TransportError> {
    let parsed: ChatResponseBody = serde_json::from_str(body)
        .map_err(|e| TransportError::invalid_response(format!("Failed to parse response: {e}")))?;

    Ok(ChatAnswer {
        answer: parsed.answer,
        sources: parsed
            .sources
            .map(|sources| sources.into_iter().map(SourceRef).collect()),
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_query(&self, query: &str) -> Result<ChatAnswer, TransportError> {
        let response = self
            .client
            .post(&self.chat_url)
            .json(&ChatRequestBody { query })
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::timeout(format!("Timed out reading response: {e}"))
            } else {
                TransportError::network(format!("Failed to read response: {e}"))
            }
        })?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        parse_answer(&body)
    }

    fn endpoint(&self) -> &str {
        &self.chat_url
    }
}

// Backend wire types

#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    answer: String,
    #[serde(default)]
    sources: Option<Vec<Value>>,
}

/// Error envelope the backend sends with a failure status
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}
