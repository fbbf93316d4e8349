//! Ark client for single-turn chat completions.

use aigate_core::ProviderEvent;
use futures_util::{Stream, StreamExt};
use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::ArkClientConfig;
use crate::error::{ArkError, ArkResult};
use crate::models::{ChatRequest, ChatResponse, ErrorBody};
use crate::sse::provider_events;

/// Longest provider error body quoted back to callers.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the Ark chat completions endpoint.
///
/// Holds a pooled `reqwest::Client`; share one instance behind an `Arc`.
pub struct ArkClient {
    http: reqwest::Client,
    config: ArkClientConfig,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for ArkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArkClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl ArkClient {
    /// Create a client. Fails if no API key is configured or the timeout is zero.
    pub fn new(config: ArkClientConfig) -> ArkResult<Self> {
        if config.timeout.is_zero() {
            return Err(ArkError::ZeroTimeout);
        }
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ArkError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeout)
            .build()?;

        let endpoint = config.endpoint();
        Ok(Self {
            http,
            config,
            api_key,
            endpoint,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ArkClientConfig {
        &self.config
    }

    fn post(&self, body: &ChatRequest<'_>) -> RequestBuilder {
        self.http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
    }

    fn timeout_secs(&self) -> u64 {
        self.config.timeout.as_secs()
    }

    fn classify(&self, err: reqwest::Error) -> ArkError {
        if err.is_timeout() {
            ArkError::Timeout {
                seconds: self.timeout_secs(),
            }
        } else {
            ArkError::Network(err)
        }
    }

    /// Send a request and turn non-success statuses into `ArkError::Api`.
    async fn send(&self, request: RequestBuilder) -> ArkResult<Response> {
        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ArkError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    /// Send `prompt` and return the full response text.
    pub async fn chat(&self, prompt: &str) -> ArkResult<String> {
        let body = ChatRequest::user(&self.config.model, prompt, self.config.max_tokens, false);
        debug!(model = %self.config.model, "Ark chat request");

        let response = self.send(self.post(&body).timeout(self.config.timeout)).await?;
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;

        parsed.into_text().ok_or_else(|| ArkError::InvalidResponse {
            message: "response contained no choices".to_string(),
        })
    }

    /// Send `prompt` with streaming enabled and relay events on a channel.
    ///
    /// The response headers must arrive within the configured timeout; after
    /// that the timeout bounds each idle gap between reads.
    pub async fn chat_stream(&self, prompt: &str) -> ArkResult<mpsc::Receiver<ProviderEvent>> {
        let body = ChatRequest::user(&self.config.model, prompt, self.config.max_tokens, true);
        debug!(model = %self.config.model, "Ark stream request");

        let response = tokio::time::timeout(self.config.timeout, self.send(self.post(&body)))
            .await
            .map_err(|_| ArkError::Timeout {
                seconds: self.timeout_secs(),
            })??;

        let (tx, rx) = mpsc::channel(self.config.stream_buffer);
        let events = provider_events(response.bytes_stream(), self.config.timeout);
        tokio::spawn(forward(events, tx));
        Ok(rx)
    }
}

/// Pump decoded events into the channel until the consumer goes away.
async fn forward<S>(events: S, tx: mpsc::Sender<ProviderEvent>)
where
    S: Stream<Item = ProviderEvent> + Send,
{
    let mut events = std::pin::pin!(events);
    loop {
        let next = tokio::select! {
            () = tx.closed() => {
                debug!("Stream consumer gone, dropping upstream response");
                return;
            }
            next = events.next() => next,
        };
        let Some(event) = next else {
            return;
        };
        if tx.send(event).await.is_err() {
            return;
        }
    }
}

/// Best description of a failed response.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let described = parsed.error.describe();
        if !described.is_empty() {
            return described;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
