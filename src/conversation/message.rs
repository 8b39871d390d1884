//! Message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text of the assistant entry synthesized when the backend cannot be reached
pub const CONNECTION_ERROR_TEXT: &str = "I encountered an issue connecting to the server. \
Please ensure the backend is running and try again.";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// A supporting reference returned by the backend.
///
/// The shape is owned by the backend; it is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRef(pub Value);

/// One entry of the conversation log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
    pub is_error: bool,
}

impl Message {
    pub fn user(content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: at,
            sources: None,
            is_error: false,
        }
    }

    pub fn assistant(
        content: impl Into<String>,
        sources: Option<Vec<SourceRef>>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: at,
            sources,
            is_error: false,
        }
    }

    /// Assistant entry standing in for an answer that never arrived
    pub fn connection_error(at: DateTime<Utc>) -> Self {
        Self {
            role: Role::Assistant,
            content: CONNECTION_ERROR_TEXT.to_string(),
            timestamp: at,
            sources: None,
            is_error: true,
        }
    }
}
