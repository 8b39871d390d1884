//! Session controller

use super::{SessionEvent, SessionSnapshot};
use crate::conversation::{ConversationLog, Message};
use crate::state_machine::{
    transition, Effect, Event, PendingQuery, SessionContext, SessionState, TransitionError,
};
use crate::transport::{Transport, TransportError, TransportErrorKind};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 128;

/// How a call to [`SessionController::submit`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank draft or a request already in flight; nothing changed
    Rejected,
    /// The backend's answer was appended
    Answered,
    /// The connection error message was appended
    Failed(TransportErrorKind),
    /// The log was cleared while waiting, so the resolution was dropped
    Discarded,
}

/// Mutable session data, guarded by one lock that is never held across an
/// `.await`
struct SessionInner {
    context: SessionContext,
    state: SessionState,
    log: ConversationLog,
    draft: String,
}

impl SessionInner {
    fn can_submit(&self) -> bool {
        !self.state.is_in_flight() && !self.draft.trim().is_empty()
    }

    fn awaits(&self, request: u64) -> bool {
        matches!(self.state, SessionState::AwaitingResponse { request: r, .. } if r == request)
    }
}

/// What applying an event produced besides state and log changes
#[derive(Debug, Default)]
struct Applied {
    query: Option<PendingQuery>,
    discarded: bool,
}

/// Session data shared between the controller and its pending submissions
struct Shared {
    inner: Mutex<SessionInner>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
}

/// An accepted submission whose transport call has not resolved yet.
///
/// Only [`SessionController::begin_submit`] creates one and
/// [`SessionController::complete`] consumes it. Dropping it unresolved, for
/// example when the task holding it is aborted before it first runs, fails
/// the request as aborted so the session never stays in flight.
#[must_use = "dropping a pending submission fails it as aborted"]
pub struct PendingSubmission {
    session: Arc<Shared>,
    query: PendingQuery,
    resolved: bool,
}

impl PendingSubmission {
    pub fn request(&self) -> u64 {
        self.query.request
    }

    /// Trimmed text that will be sent
    pub fn query(&self) -> &str {
        &self.query.query
    }

    fn finish(mut self, event: Event, outcome: SubmitOutcome) -> SubmitOutcome {
        self.resolved = true;
        self.session.resolve(event, outcome)
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let error = TransportError::aborted("submission dropped before the backend answered");
        tracing::warn!(
            request = self.query.request,
            kind = %error.kind,
            error = %error.message,
            "Query abandoned, showing connection error"
        );
        self.session.resolve(
            Event::TransportFailed {
                request: self.query.request,
                kind: error.kind,
                at: Utc::now(),
            },
            SubmitOutcome::Failed(error.kind),
        );
    }
}

/// Owns one conversation and serializes it against a transport.
///
/// At most one query is outstanding at a time; the state machine rejects any
/// submission made while one is pending.
pub struct SessionController<T: Transport + 'static> {
    shared: Arc<Shared>,
    transport: T,
}

impl<T: Transport + 'static> SessionController<T> {
    pub fn new(transport: T) -> Self {
        let (broadcast_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %session_id,
            endpoint = %transport.endpoint(),
            "Session created"
        );

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(SessionInner {
                    context: SessionContext::new(session_id),
                    state: SessionState::Idle,
                    log: ConversationLog::new(),
                    draft: String::new(),
                }),
                broadcast_tx,
            }),
            transport,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.shared.lock()
    }

    // ------------------------------------------------------------------
    // User operations
    // ------------------------------------------------------------------

    /// Replace the pending input
    pub fn update_draft(&self, text: impl Into<String>) {
        let mut inner = self.lock();
        let could_submit = inner.can_submit();
        inner.draft = text.into();

        self.shared.notify(SessionEvent::Draft {
            text: inner.draft.clone(),
        });
        if inner.can_submit() != could_submit {
            self.shared.notify_state(&inner);
        }
    }

    /// Send the current draft and wait for its resolution.
    ///
    /// A blank draft or a call made while another query is pending does
    /// nothing and returns [`SubmitOutcome::Rejected`].
    pub async fn submit(&self) -> SubmitOutcome {
        match self.begin_submit() {
            Some(pending) => self.complete(pending).await,
            None => SubmitOutcome::Rejected,
        }
    }

    /// Accept the current draft: append it as a user message, clear the
    /// input and enter the in-flight state. Returns the submission to
    /// deliver, or `None` if it was not accepted.
    pub fn begin_submit(&self) -> Option<PendingSubmission> {
        let mut inner = self.lock();
        let event = Event::Submit {
            draft: inner.draft.clone(),
            at: Utc::now(),
        };

        match self.shared.apply(&mut inner, event) {
            Ok(applied) => {
                let query = applied.query?;
                tracing::info!(
                    session_id = %inner.context.session_id,
                    request = query.request,
                    query_chars = query.query.chars().count(),
                    "Submission accepted"
                );
                Some(PendingSubmission {
                    session: Arc::clone(&self.shared),
                    query,
                    resolved: false,
                })
            }
            Err(e) => {
                tracing::debug!(
                    session_id = %inner.context.session_id,
                    reason = %e,
                    "Submission ignored"
                );
                None
            }
        }
    }

    /// Deliver an accepted submission and apply its resolution.
    ///
    /// A submission that is not this session's outstanding request is not
    /// sent and yields [`SubmitOutcome::Rejected`]. Dropping the returned
    /// future before it finishes still resolves the request, as an aborted
    /// failure.
    pub async fn complete(&self, pending: PendingSubmission) -> SubmitOutcome {
        if !self.is_outstanding(&pending) {
            // A submission from another session is failed there on drop
            tracing::error!(
                request = pending.request(),
                "Submission does not belong to this session, not sending"
            );
            return SubmitOutcome::Rejected;
        }

        let result = self.transport.send_query(pending.query()).await;
        let request = pending.request();

        match result {
            Ok(answer) => pending.finish(
                Event::ResponseReceived {
                    request,
                    answer,
                    at: Utc::now(),
                },
                SubmitOutcome::Answered,
            ),
            Err(e) => {
                tracing::warn!(
                    request,
                    kind = %e.kind,
                    error = %e.message,
                    "Query failed, showing connection error"
                );
                pending.finish(
                    Event::TransportFailed {
                        request,
                        kind: e.kind,
                        at: Utc::now(),
                    },
                    SubmitOutcome::Failed(e.kind),
                )
            }
        }
    }

    /// Empty the log. The draft and any in-flight request are left alone.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if let Err(e) = self.shared.apply(&mut inner, Event::Clear) {
            tracing::error!(error = %e, "Clear rejected");
        }
    }

    fn is_outstanding(&self, pending: &PendingSubmission) -> bool {
        Arc::ptr_eq(&self.shared, &pending.session) && self.lock().awaits(pending.request())
    }

    // ------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------

    pub fn session_id(&self) -> String {
        self.lock().context.session_id.clone()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().log.messages().to_vec()
    }

    pub fn pending_input(&self) -> String {
        self.lock().draft.clone()
    }

    pub fn in_flight(&self) -> bool {
        self.lock().state.is_in_flight()
    }

    pub fn can_submit(&self) -> bool {
        self.lock().can_submit()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log.is_empty()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            session_id: inner.context.session_id.clone(),
            messages: inner.log.messages().to_vec(),
            pending_input: inner.draft.clone(),
            in_flight: inner.state.is_in_flight(),
            can_submit: inner.can_submit(),
            is_empty: inner.log.is_empty(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.broadcast_tx.subscribe()
    }
}

// ----------------------------------------------------------------------
// Effect execution
// ----------------------------------------------------------------------

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, event: Event, outcome: SubmitOutcome) -> SubmitOutcome {
        let request = event.request();
        let mut inner = self.lock();
        match self.apply(&mut inner, event) {
            Ok(applied) if applied.discarded => SubmitOutcome::Discarded,
            Ok(_) => outcome,
            Err(e) => {
                tracing::error!(request = ?request, error = %e, "Resolution rejected");
                SubmitOutcome::Discarded
            }
        }
    }

    fn apply(&self, inner: &mut SessionInner, event: Event) -> Result<Applied, TransitionError> {
        let result = transition(&inner.state, &inner.context, event)?;
        inner.state = result.new_state;

        let mut applied = Applied::default();
        for effect in result.effects {
            self.execute_effect(inner, effect, &mut applied);
        }
        Ok(applied)
    }

    fn execute_effect(&self, inner: &mut SessionInner, effect: Effect, applied: &mut Applied) {
        match effect {
            Effect::AppendMessage(message) => {
                inner.log.push(message.clone());
                self.notify(SessionEvent::Message { message });
            }

            Effect::ClearDraft => {
                inner.draft.clear();
                self.notify(SessionEvent::Draft {
                    text: String::new(),
                });
            }

            Effect::SendQuery(pending) => {
                inner.context.next_request = pending.request + 1;
                applied.query = Some(pending);
            }

            Effect::ClearLog => {
                inner.log.clear();
                inner.context.generation = inner.log.generation();
                self.notify(SessionEvent::Cleared {
                    generation: inner.context.generation,
                });
            }

            Effect::DiscardResolution {
                request,
                generation,
            } => {
                tracing::info!(
                    session_id = %inner.context.session_id,
                    request,
                    generation,
                    current_generation = inner.context.generation,
                    "Dropping resolution for a cleared conversation"
                );
                applied.discarded = true;
            }

            Effect::NotifyStateChange => self.notify_state(inner),
        }
    }

    fn notify_state(&self, inner: &SessionInner) {
        self.notify(SessionEvent::StateChange {
            in_flight: inner.state.is_in_flight(),
            can_submit: inner.can_submit(),
        });
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.broadcast_tx.send(event);
    }
}
