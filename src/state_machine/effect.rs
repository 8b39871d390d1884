//! Effects produced by state transitions

use crate::conversation::Message;

/// A query accepted for delivery to the backend. Not `Clone`: each accepted
/// submission is delivered once.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingQuery {
    pub request: u64,
    /// Trimmed user text
    pub query: String,
    pub generation: u64,
}

/// Effects to be executed after state transition
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Append a message to the conversation log
    AppendMessage(Message),

    /// Empty the pending input
    ClearDraft,

    /// Hand the query to the transport
    SendQuery(PendingQuery),

    /// Empty the conversation log and start a new generation
    ClearLog,

    /// Drop a resolution whose transcript was cleared while it was in flight
    DiscardResolution { request: u64, generation: u64 },

    /// Tell subscribers the busy/idle state changed
    NotifyStateChange,
}
