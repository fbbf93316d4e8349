//! Internal error types for Ark operations.
//!
//! These errors are internal to `aigate-ark` and are mapped to the core
//! `ProviderError` at the port boundary.

use thiserror::Error;

/// Result type alias for Ark operations.
pub type ArkResult<T> = Result<T, ArkError>;

/// Errors related to Ark API operations.
#[derive(Debug, Error)]
pub enum ArkError {
    /// No API key was configured.
    #[error("ARK_API_KEY is not set")]
    MissingApiKey,

    /// A zero request timeout would fail every call.
    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,

    /// The API answered with a non-success status.
    #[error("Ark API request failed with status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Provider message, or the status reason
        message: String,
    },

    /// The API returned an invalid or unexpected response.
    #[error("Invalid response from Ark API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("Ark API request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
