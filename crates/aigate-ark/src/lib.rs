//! Volcengine Ark client for the aigate chat completion port.
//!
//! Ark exposes an OpenAI-compatible `chat/completions` endpoint. This crate
//! implements [`aigate_core::ChatCompletionPort`] on top of it:
//!
//! - blocking calls return the first choice's message text
//! - streaming calls decode the SSE body into `ProviderEvent`s on a channel
//!
//! ```no_run
//! use aigate_ark::{ArkClient, ArkClientConfig};
//!
//! let client = ArkClient::new(ArkClientConfig::new().with_api_key("ak-..."))?;
//! # Ok::<(), aigate_ark::ArkError>(())
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod client;
mod config;
mod error;
mod models;
mod port;
mod sse;

// ============================================================================
// Public API
// ============================================================================

// Client
pub use client::ArkClient;

// Configuration
pub use config::{
    ArkClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_STREAM_BUFFER,
    DEFAULT_TIMEOUT,
};

// Errors
pub use error::{ArkError, ArkResult};

// Silence unused dev-dependency warnings
#[cfg(test)]
use axum as _;
#[cfg(test)]
use tokio_test as _;
