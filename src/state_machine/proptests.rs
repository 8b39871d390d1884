//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::conversation::{Message, Role};
use crate::transport::{ChatAnswer, TransportErrorKind};
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Test Harness
// ============================================================================

/// Applies effects the way the controller does, without any I/O
struct Harness {
    state: SessionState,
    context: SessionContext,
    log: Vec<Message>,
    draft: String,
    sent: Vec<PendingQuery>,
    discarded: usize,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: SessionState::Idle,
            context: SessionContext::new("prop-session"),
            log: Vec::new(),
            draft: String::new(),
            sent: Vec::new(),
            discarded: 0,
        }
    }

    fn outstanding(&self) -> Option<u64> {
        match self.state {
            SessionState::AwaitingResponse { request, .. } => Some(request),
            SessionState::Idle => None,
        }
    }

    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;
        for effect in result.effects {
            match effect {
                Effect::AppendMessage(message) => self.log.push(message),
                Effect::ClearDraft => self.draft.clear(),
                Effect::SendQuery(pending) => {
                    self.context.next_request += 1;
                    self.sent.push(pending);
                }
                Effect::ClearLog => {
                    self.log.clear();
                    self.context.generation += 1;
                }
                Effect::DiscardResolution { .. } => self.discarded += 1,
                Effect::NotifyStateChange => {}
            }
        }
        Ok(())
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Type(String),
    Submit,
    Succeed(String),
    Fail(TransportErrorKind),
    Clear,
}

fn arb_draft() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t\n]{1,6}",
        "[ ]{0,3}[a-zA-Z?]{1,20}[ ]{0,3}",
    ]
}

fn arb_error_kind() -> impl Strategy<Value = TransportErrorKind> {
    prop_oneof![
        Just(TransportErrorKind::Timeout),
        Just(TransportErrorKind::ConnectionRefused),
        Just(TransportErrorKind::Network),
        Just(TransportErrorKind::ServerError),
        Just(TransportErrorKind::InvalidResponse),
        Just(TransportErrorKind::Aborted),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_draft().prop_map(Op::Type),
        3 => Just(Op::Submit),
        2 => "[a-zA-Z .]{1,40}".prop_map(Op::Succeed),
        1 => arb_error_kind().prop_map(Op::Fail),
        1 => Just(Op::Clear),
    ]
}

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::Idle),
        (1u64..100, 0u64..5).prop_map(|(request, generation)| {
            SessionState::AwaitingResponse {
                request,
                generation,
            }
        }),
    ]
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Blank drafts never leave Idle
    #[test]
    fn prop_blank_draft_never_submits(draft in "[ \t\r\n]{0,10}") {
        let result = transition(
            &SessionState::Idle,
            &SessionContext::new("s"),
            Event::Submit { draft, at: Utc::now() },
        );
        prop_assert_eq!(result.unwrap_err(), TransitionError::EmptyDraft);
    }

    /// Any submit while awaiting is rejected, whatever the draft
    #[test]
    fn prop_submit_rejected_while_awaiting(draft in arb_draft(), request in 1u64..100) {
        let state = SessionState::AwaitingResponse { request, generation: 0 };
        let result = transition(
            &state,
            &SessionContext::new("s"),
            Event::Submit { draft, at: Utc::now() },
        );
        prop_assert_eq!(result.unwrap_err(), TransitionError::AwaitingResponse(request));
    }

    /// Clear succeeds in every state, keeps it, and only clears the log
    #[test]
    fn prop_clear_always_allowed(state in arb_state()) {
        let result = transition(&state, &SessionContext::new("s"), Event::Clear).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.effects, vec![Effect::ClearLog]);
    }

    /// Accepted submissions always carry the trimmed draft
    #[test]
    fn prop_query_is_trimmed(draft in "[ ]{0,3}[a-z]{1,10}[ \n]{0,3}") {
        let result = transition(
            &SessionState::Idle,
            &SessionContext::new("s"),
            Event::Submit { draft: draft.clone(), at: Utc::now() },
        ).unwrap();
        let sent: Vec<_> = result.effects.iter().filter_map(|e| match e {
            Effect::SendQuery(p) => Some(p.query.clone()),
            _ => None,
        }).collect();
        prop_assert_eq!(sent, vec![draft.trim().to_string()]);
    }

    /// Whole-session invariants over arbitrary interleavings of user and
    /// transport events
    #[test]
    fn prop_session_invariants(ops in proptest::collection::vec(arb_op(), 1..60)) {
        let mut h = Harness::new();

        for op in ops {
            let log_before = h.log.len();
            let sent_before = h.sent.len();
            let was_in_flight = h.state.is_in_flight();

            match op {
                Op::Type(text) => h.draft = text,
                Op::Submit => {
                    let draft = h.draft.clone();
                    let accepted = !was_in_flight && !draft.trim().is_empty();
                    let result = h.apply(Event::Submit { draft: draft.clone(), at: Utc::now() });
                    prop_assert_eq!(result.is_ok(), accepted);
                    if accepted {
                        // User message lands before any resolution
                        prop_assert_eq!(h.log.len(), log_before + 1);
                        prop_assert_eq!(h.log.last().map(|m| m.role), Some(Role::User));
                        prop_assert_eq!(h.sent.len(), sent_before + 1);
                        prop_assert!(h.draft.is_empty());
                    } else {
                        prop_assert!(result.unwrap_err().is_benign());
                        prop_assert_eq!(h.log.len(), log_before);
                        prop_assert_eq!(h.sent.len(), sent_before);
                        prop_assert_eq!(h.draft.clone(), draft);
                    }
                }
                Op::Succeed(_) | Op::Fail(_) if h.outstanding().is_none() => {
                    let result = h.apply(Event::TransportFailed {
                        request: 999,
                        kind: TransportErrorKind::Network,
                        at: Utc::now(),
                    });
                    prop_assert_eq!(result.unwrap_err(), TransitionError::UnknownRequest(999));
                }
                Op::Succeed(answer) => {
                    let request = h.outstanding().unwrap_or_default();
                    h.apply(Event::ResponseReceived {
                        request,
                        answer: ChatAnswer::text(answer),
                        at: Utc::now(),
                    }).unwrap();
                    prop_assert!(!h.state.is_in_flight());
                }
                Op::Fail(kind) => {
                    let request = h.outstanding().unwrap_or_default();
                    h.apply(Event::TransportFailed { request, kind, at: Utc::now() }).unwrap();
                    prop_assert!(!h.state.is_in_flight());
                    if h.log.len() > log_before {
                        let last = h.log.last().unwrap();
                        prop_assert!(last.is_error);
                        prop_assert!(last.sources.is_none());
                    }
                }
                Op::Clear => {
                    h.apply(Event::Clear).unwrap();
                    prop_assert!(h.log.is_empty());
                    prop_assert_eq!(h.state.is_in_flight(), was_in_flight);
                }
            }

            // At most one outstanding request, and it is the last one sent
            prop_assert_eq!(
                h.outstanding(),
                if h.state.is_in_flight() { h.sent.last().map(|p| p.request) } else { None }
            );

            // Within a generation the log strictly alternates user/assistant
            for (i, message) in h.log.iter().enumerate() {
                let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
                prop_assert_eq!(message.role, expected);
            }

            // Odd length means exactly the latest question is still unanswered
            let awaiting_current = matches!(
                h.state,
                SessionState::AwaitingResponse { generation, .. } if generation == h.context.generation
            );
            prop_assert_eq!(h.log.len() % 2 == 1, awaiting_current);
        }

        // Every query that went out was eventually either answered, discarded
        // or is still outstanding
        let resolved = h.sent.len() - usize::from(h.state.is_in_flight());
        prop_assert!(h.discarded <= resolved);
    }
}
