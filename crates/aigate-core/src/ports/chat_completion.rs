//! Chat completion port.
//!
//! The LLM provider is an external collaborator. The core only sees this
//! trait; the Ark implementation lives in `aigate-ark`.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::ProviderEvent;

/// Errors from chat completion port operations.
///
/// Adapter-specific errors (HTTP, JSON) are mapped to these at the
/// adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Could not reach the provider or the connection broke.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
    },

    /// The provider answered with an error status.
    #[error("Provider returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider-supplied message
        message: String,
    },

    /// The provider answered with something we could not interpret.
    #[error("Invalid provider response: {message}")]
    InvalidResponse {
        /// What was invalid
        message: String,
    },

    /// The request did not complete in time.
    #[error("Provider request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout
        seconds: u64,
    },
}

/// Result type alias for chat completion port operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Port trait for a single-turn chat completion provider.
///
/// # Design
///
/// - Takes a fully rendered prompt; function resolution happens upstream
/// - Streaming returns one tagged channel instead of separate chunk/done/error channels
/// - Implementations hold no per-call mutable state and are shared behind `Arc`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletionPort: Send + Sync {
    /// Send `prompt` and wait for the full response text.
    async fn complete(&self, prompt: &str) -> ProviderResult<String>;

    /// Send `prompt` and receive incremental output.
    ///
    /// Errors that happen before the stream opens are returned directly;
    /// errors after that arrive in-band as [`ProviderEvent::Failed`].
    async fn stream(&self, prompt: &str) -> ProviderResult<mpsc::Receiver<ProviderEvent>>;
}
