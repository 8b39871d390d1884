//! Session state types

use serde::Serialize;

/// Where the session is in its request/response cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// No request outstanding; a new submission may start
    #[default]
    Idle,
    /// Exactly one query is with the backend
    AwaitingResponse {
        /// Sequence number of the outstanding request
        request: u64,
        /// Log generation at the time the query was accepted
        generation: u64,
    },
}

impl SessionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::AwaitingResponse { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingResponse { .. } => "awaiting_response",
        }
    }
}

/// Read-only facts the transition function needs besides the state itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: String,
    /// Current log generation
    pub generation: u64,
    /// Sequence number the next accepted submission will carry
    pub next_request: u64,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            generation: 0,
            next_request: 1,
        }
    }
}
