//! Runtime for driving a chat session
//!
//! Owns the conversation log and draft, applies state machine effects and
//! performs the single outstanding transport call.

mod executor;


pub use executor::{PendingSubmission, SessionController, SubmitOutcome};

use crate::conversation::Message;
use crate::transport::LoggingTransport;
use serde::Serialize;

/// Type alias for the production session with the logging HTTP transport
pub type ProductionSession = SessionController<LoggingTransport>;

/// Changes pushed to subscribed clients
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A message was appended to the log
    Message { message: Message },
    /// The pending input changed
    Draft { text: String },
    /// Busy/idle or submit enablement changed
    StateChange { in_flight: bool, can_submit: bool },
    /// The log was emptied
    Cleared { generation: u64 },
}

/// Everything the presentation layer reads, captured at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub messages: Vec<Message>,
    pub pending_input: String,
    pub in_flight: bool,
    pub can_submit: bool,
    pub is_empty: bool,
}
