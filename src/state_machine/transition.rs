//! Pure state transition function

use super::{Effect, Event, PendingQuery, SessionContext, SessionState};
use crate::conversation::Message;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Nothing to send: draft is empty")]
    EmptyDraft,
    #[error("A response is still pending (request {0})")]
    AwaitingResponse(u64),
    #[error("No outstanding request {0}")]
    UnknownRequest(u64),
}

impl TransitionError {
    /// Rejections a caller should treat as a silent no-op
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::EmptyDraft | Self::AwaitingResponse(_))
    }
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs; timestamps
/// arrive inside the events.
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (*state, event) {
        // Idle + Submit -> AwaitingResponse, user message appended optimistically
        (SessionState::Idle, Event::Submit { draft, at }) => {
            let query = draft.trim();
            if query.is_empty() {
                return Err(TransitionError::EmptyDraft);
            }

            let pending = PendingQuery {
                request: context.next_request,
                query: query.to_string(),
                generation: context.generation,
            };
            Ok(TransitionResult::new(SessionState::AwaitingResponse {
                request: pending.request,
                generation: pending.generation,
            })
            .with_effect(Effect::AppendMessage(Message::user(query, at)))
            .with_effect(Effect::ClearDraft)
            .with_effect(Effect::NotifyStateChange)
            .with_effect(Effect::SendQuery(pending)))
        }

        // Only one query may be outstanding
        (SessionState::AwaitingResponse { request, .. }, Event::Submit { .. }) => {
            Err(TransitionError::AwaitingResponse(request))
        }

        // Resolution for the outstanding request -> Idle
        (
            SessionState::AwaitingResponse {
                request,
                generation,
            },
            Event::ResponseReceived {
                request: answered,
                answer,
                at,
            },
        ) if answered == request => Ok(resolve(
            request,
            generation,
            context,
            Message::assistant(answer.answer, answer.sources, at),
        )),

        (
            SessionState::AwaitingResponse {
                request,
                generation,
            },
            Event::TransportFailed {
                request: failed,
                at,
                ..
            },
        ) if failed == request => Ok(resolve(
            request,
            generation,
            context,
            Message::connection_error(at),
        )),

        // Resolutions that match nothing outstanding
        (_, Event::ResponseReceived { request, .. } | Event::TransportFailed { request, .. }) => {
            Err(TransitionError::UnknownRequest(request))
        }

        // Clear is allowed in every state and never touches the in-flight request
        (state, Event::Clear) => {
            Ok(TransitionResult::new(state).with_effect(Effect::ClearLog))
        }
    }
}

/// Return to idle, appending the resolution unless its transcript was cleared
fn resolve(
    request: u64,
    generation: u64,
    context: &SessionContext,
    message: Message,
) -> TransitionResult {
    let result = TransitionResult::new(SessionState::Idle);
    let result = if generation == context.generation {
        result.with_effect(Effect::AppendMessage(message))
    } else {
        result.with_effect(Effect::DiscardResolution {
            request,
            generation,
        })
    };
    result.with_effect(Effect::NotifyStateChange)
}
