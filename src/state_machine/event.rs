//! Events that can occur in a session

use crate::transport::{ChatAnswer, TransportErrorKind};
use chrono::{DateTime, Utc};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    Submit {
        /// Raw draft, untrimmed
        draft: String,
        at: DateTime<Utc>,
    },
    Clear,

    // Transport events
    ResponseReceived {
        request: u64,
        answer: ChatAnswer,
        at: DateTime<Utc>,
    },
    TransportFailed {
        request: u64,
        kind: TransportErrorKind,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Request a resolution event answers, if any
    pub fn request(&self) -> Option<u64> {
        match self {
            Event::ResponseReceived { request, .. } | Event::TransportFailed { request, .. } => {
                Some(*request)
            }
            Event::Submit { .. } | Event::Clear => None,
        }
    }
}
