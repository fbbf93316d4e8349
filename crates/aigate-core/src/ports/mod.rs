//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.

pub mod chat_completion;

use thiserror::Error;

pub use chat_completion::{ChatCompletionPort, ProviderError, ProviderResult};

#[cfg(test)]
pub use chat_completion::MockChatCompletionPort;

use crate::domain::FunctionError;

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters map it to their own error types (HTTP envelopes, CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested function is not registered.
    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The provider call failed.
    #[error("Provider call failed: {0}")]
    Provider(#[from] ProviderError),
}

impl From<FunctionError> for CoreError {
    fn from(err: FunctionError) -> Self {
        match err {
            FunctionError::Unsupported(name) => Self::UnsupportedFunction(name),
            FunctionError::EmptyContent => Self::Validation(err.to_string()),
        }
    }
}

impl CoreError {
    /// Whether this error was caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedFunction(_) | Self::Validation(_))
    }
}
