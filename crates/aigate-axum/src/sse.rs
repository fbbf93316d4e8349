//! SSE encoding for stream relay output.
//!
//! Each `StreamEvent` becomes one `data: <payload>` frame. The response body
//! owns a drop guard for the relay's cancellation token, so a client
//! disconnect cancels the relay.

use std::convert::Infallible;

use aigate_core::StreamEvent;
use axum::http::{HeaderValue, header};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::stream::{self, Stream};
use tokio::sync::mpsc;
use tokio_util::sync::DropGuard;

/// Content type announced for stream responses.
pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream; charset=utf-8";

/// Encode one stream event as an SSE frame.
pub fn to_sse_event(event: &StreamEvent) -> Event {
    match event.payload() {
        Ok(payload) => Event::default().data(payload),
        Err(e) => {
            tracing::warn!("Failed to serialize stream event: {}", e);
            Event::default().data(r#"{"type":"error","msg":"failed to encode stream event"}"#)
        }
    }
}

/// Body stream: yields frames until the relay closes its channel.
///
/// `guard` lives exactly as long as the body; dropping the body (client
/// gone) cancels the relay.
pub fn event_stream(
    events: mpsc::Receiver<StreamEvent>,
    guard: DropGuard,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    stream::unfold((events, guard), |(mut events, guard)| async move {
        let event = events.recv().await?;
        Some((Ok(to_sse_event(&event)), (events, guard)))
    })
}

/// Build the HTTP response for a relay.
pub fn relay_response(events: mpsc::Receiver<StreamEvent>, guard: DropGuard) -> Response {
    let mut response = Sse::new(event_stream(events, guard)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(EVENT_STREAM_CONTENT_TYPE),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}
