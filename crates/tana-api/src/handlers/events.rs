//! Server-sent event stream of hub events.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::Stream;
use futures::stream;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use tana_core::events::Event;

use crate::extractors::AuthSession;
use crate::state::AppState;

/// GET /api/events
///
/// Streams every hub event to an authenticated client, one SSE message per
/// event with the event type as the SSE event name. A client that falls
/// behind skips the events it missed. Types that cannot be an SSE event
/// name are sent as unnamed messages.
pub async fn stream_events(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    debug!(user_id = session.user.id, "Event stream opened");
    let rx = state.hub.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((Ok(to_sse(&event)), rx)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream client lagging");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

/// SSE field values are single-line; a type with a line break would abort
/// the stream, so it is left out of the frame.
fn sse_event_name(kind: &str) -> Option<&str> {
    (!kind.is_empty() && !kind.contains(['\n', '\r'])).then_some(kind)
}

fn to_sse(event: &Event) -> SseEvent {
    let frame = match sse_event_name(&event.kind) {
        Some(name) => SseEvent::default().event(name),
        None => {
            debug!(kind = ?event.kind, "Event type is not a valid SSE event name");
            SseEvent::default()
        }
    };
    frame.json_data(event).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to encode event for stream");
        SseEvent::default().comment("unencodable event")
    })
}
