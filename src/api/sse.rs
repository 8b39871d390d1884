//! Server-Sent Events support

use crate::runtime::{SessionEvent, SessionSnapshot};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    snapshot: SessionSnapshot,
    broadcast_rx: tokio::sync::broadcast::Receiver<SessionEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Start with the full snapshot, then live changes
    let init = futures::stream::once(async move {
        Ok(Event::default().event("init").data(
            json!({
                "type": "init",
                "session": snapshot
            })
            .to_string(),
        ))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(session_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn session_event_to_axum(event: SessionEvent) -> Event {
    let (event_type, data) = session_event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn session_event_payload(event: SessionEvent) -> (&'static str, serde_json::Value) {
    match event {
        SessionEvent::Message { message } => (
            "message",
            json!({
                "type": "message",
                "message": message
            }),
        ),
        SessionEvent::Draft { text } => (
            "draft",
            json!({
                "type": "draft",
                "text": text
            }),
        ),
        SessionEvent::StateChange {
            in_flight,
            can_submit,
        } => (
            "state_change",
            json!({
                "type": "state_change",
                "in_flight": in_flight,
                "can_submit": can_submit
            }),
        ),
        SessionEvent::Cleared { generation } => (
            "cleared",
            json!({
                "type": "cleared",
                "generation": generation
            }),
        ),
    }
}
