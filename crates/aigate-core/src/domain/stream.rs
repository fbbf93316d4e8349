//! Stream event types.
//!
//! `ProviderEvent` is what a provider adapter produces; `StreamEvent` is
//! what the relay hands to a transport.

use serde::{Deserialize, Serialize};

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Tagged event produced by a provider stream adapter.
///
/// A stream yields any number of `Delta`s followed by at most one of
/// `Finished` or `Failed`. A channel that closes without either is treated
/// as a clean finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Incremental output text, verbatim.
    Delta(String),
    /// The provider closed the stream normally.
    Finished { usage: Option<TokenUsage> },
    /// The stream broke mid-flight.
    Failed(String),
}

/// Client-visible stream event.
///
/// The JSON payload matches the frames the frontend consumes:
///
/// ```text
/// {"type":"text","msg":"..."}
/// {"type":"text"}                      // completion marker
/// {"type":"meta","messageId":"...","index":1,"tokenUsageInfo":{...}}
/// {"type":"error","msg":"..."}
/// [DONE]                               // terminal sentinel
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One provider chunk.
    Text(String),
    /// Completion marker (a `text` frame without `msg`).
    Completed,
    /// Correlation id and token usage.
    Meta {
        message_id: String,
        usage: TokenUsage,
    },
    /// Provider or validation error.
    Error(String),
    /// Terminal sentinel.
    Done,
}

/// Literal payload of the terminal sentinel frame.
pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Frame<'a> {
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        msg: Option<&'a str>,
    },
    Meta {
        #[serde(rename = "messageId")]
        message_id: &'a str,
        index: u32,
        #[serde(rename = "tokenUsageInfo")]
        token_usage_info: &'a TokenUsage,
    },
    Error {
        msg: &'a str,
    },
}

impl StreamEvent {
    /// Whether this is the terminal sentinel.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Render the frame payload (the part after `data: `).
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        let frame = match self {
            Self::Text(msg) => Frame::Text {
                msg: Some(msg.as_str()),
            },
            Self::Completed => Frame::Text { msg: None },
            Self::Meta { message_id, usage } => Frame::Meta {
                message_id,
                index: 1,
                token_usage_info: usage,
            },
            Self::Error(msg) => Frame::Error { msg },
            Self::Done => return Ok(DONE_SENTINEL.to_string()),
        };
        serde_json::to_string(&frame)
    }
}
