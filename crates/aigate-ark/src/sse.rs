//! Decoding of Ark streaming responses into provider events.
//!
//! Raw bytes are buffered until a full line is available and only then
//! decoded, so a multi-byte character split across network reads is never
//! corrupted.

use std::fmt::Display;
use std::time::Duration;

use aigate_core::{DONE_SENTINEL, ProviderEvent, TokenUsage};
use bytes::{Bytes, BytesMut};
use futures_util::stream::{BoxStream, Stream, StreamExt};
use tracing::{debug, warn};

use crate::models::ChatChunk;

/// One meaningful SSE line.
#[derive(Debug)]
pub(crate) enum SseLine {
    /// `data: [DONE]`
    Done,
    /// `data: {...}`
    Chunk(ChatChunk),
}

/// Interpret one complete line. Blank lines, comments and other fields are
/// skipped; unparseable payloads are logged and skipped.
pub(crate) fn parse_line(line: &str) -> Option<SseLine> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }
    let data = trimmed.strip_prefix("data:")?.trim();
    if data == DONE_SENTINEL {
        return Some(SseLine::Done);
    }
    match serde_json::from_str::<ChatChunk>(data) {
        Ok(chunk) => Some(SseLine::Chunk(chunk)),
        Err(e) => {
            warn!(error = %e, "Skipping unparseable stream chunk");
            None
        }
    }
}

/// Find the next newline in the buffer, returning the position after it.
fn find_newline(buf: &BytesMut) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n').map(|pos| pos + 1)
}

/// State threaded through the `unfold` stream.
struct DecodeState<E> {
    stream: BoxStream<'static, Result<Bytes, E>>,
    buf: BytesMut,
    idle_timeout: Duration,
    usage: Option<TokenUsage>,
    done: bool,
}

impl<E> DecodeState<E> {
    /// Take the next complete line from the buffer, or the remainder at EOF.
    fn take_line(&mut self, at_eof: bool) -> Option<String> {
        let end = match find_newline(&self.buf) {
            Some(end) => end,
            None if at_eof && !self.buf.is_empty() => self.buf.len(),
            None => return None,
        };
        let line = self.buf.split_to(end);
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn finish(&mut self) -> ProviderEvent {
        self.done = true;
        ProviderEvent::Finished { usage: self.usage }
    }

    fn fail(&mut self, message: String) -> ProviderEvent {
        self.done = true;
        ProviderEvent::Failed(message)
    }

    /// Process buffered lines until one yields an event.
    fn drain(&mut self, at_eof: bool) -> Option<ProviderEvent> {
        while let Some(line) = self.take_line(at_eof) {
            match parse_line(&line) {
                Some(SseLine::Done) => return Some(self.finish()),
                Some(SseLine::Chunk(chunk)) => {
                    if let Some(error) = &chunk.error {
                        return Some(self.fail(error.describe()));
                    }
                    if let Some(usage) = chunk.usage {
                        self.usage = Some(usage.into());
                    }
                    let text = chunk.delta_text();
                    if !text.is_empty() {
                        return Some(ProviderEvent::Delta(text.to_string()));
                    }
                }
                None => {}
            }
        }
        None
    }
}

/// Convert an SSE byte stream into provider events.
///
/// The stream yields `Delta`s and ends with exactly one `Finished` or
/// `Failed`. A read error, an in-band error object or a gap longer than
/// `idle_timeout` between reads yields `Failed`; `[DONE]` or a clean end of
/// input yields `Finished`.
pub(crate) fn provider_events<S, E>(
    byte_stream: S,
    idle_timeout: Duration,
) -> impl Stream<Item = ProviderEvent> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = DecodeState {
        stream: byte_stream.boxed(),
        buf: BytesMut::new(),
        idle_timeout,
        usage: None,
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            if let Some(event) = st.drain(false) {
                return Some((event, st));
            }

            // Need more data from upstream.
            match tokio::time::timeout(st.idle_timeout, st.stream.next()).await {
                Ok(Some(Ok(chunk))) => st.buf.extend_from_slice(&chunk),
                Ok(Some(Err(e))) => {
                    warn!(error = %e, "Upstream stream error");
                    let event = st.fail(e.to_string());
                    return Some((event, st));
                }
                Ok(None) => {
                    // Stream ended without [DONE]; flush any unterminated line.
                    // A trailing delta is followed by the finish on the next poll.
                    st.stream = futures_util::stream::empty().boxed();
                    let event = st.drain(true).unwrap_or_else(|| {
                        debug!("Upstream closed without [DONE]");
                        st.finish()
                    });
                    return Some((event, st));
                }
                Err(_) => {
                    let seconds = st.idle_timeout.as_secs();
                    let event = st.fail(format!("Stream idle for more than {seconds}s"));
                    return Some((event, st));
                }
            }
        }
    })
}
