//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to replace the draft
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

/// Response for a submit action
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// False when the draft was blank or a request is already in flight
    pub accepted: bool,
}

/// Suggested prompt as listed to clients
#[derive(Debug, Serialize)]
pub struct PromptInfo {
    pub index: usize,
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// Response with the suggested prompts
#[derive(Debug, Serialize)]
pub struct PromptsResponse {
    pub prompts: Vec<PromptInfo>,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub session_id: String,
    /// `idle` or `awaiting_response`
    pub state: &'static str,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
