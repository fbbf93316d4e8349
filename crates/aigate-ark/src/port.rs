//! Port trait implementation for `ArkClient`.
//!
//! Maps internal `ArkError`s to the core `ProviderError` at the boundary.

use aigate_core::ProviderEvent;
use aigate_core::ports::{ChatCompletionPort, ProviderError, ProviderResult};
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::client::ArkClient;
use crate::error::ArkError;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ArkError` to core `ProviderError`.
fn map_error(err: ArkError) -> ProviderError {
    match err {
        ArkError::MissingApiKey => ProviderError::Api {
            status: 401,
            message: ArkError::MissingApiKey.to_string(),
        },
        ArkError::ZeroTimeout => ProviderError::Timeout { seconds: 0 },
        ArkError::Api { status, message } => ProviderError::Api { status, message },
        ArkError::InvalidResponse { message } => ProviderError::InvalidResponse { message },
        ArkError::Timeout { seconds } => ProviderError::Timeout { seconds },
        ArkError::Network(e) => ProviderError::Network {
            message: e.to_string(),
        },
        ArkError::JsonParse(e) => ProviderError::InvalidResponse {
            message: e.to_string(),
        },
    }
}

impl From<ArkError> for ProviderError {
    fn from(err: ArkError) -> Self {
        map_error(err)
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl ChatCompletionPort for ArkClient {
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        self.chat(prompt).await.map_err(map_error)
    }

    async fn stream(&self, prompt: &str) -> ProviderResult<mpsc::Receiver<ProviderEvent>> {
        self.chat_stream(prompt).await.map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_status_and_message() {
        let mapped = map_error(ArkError::Api {
            status: 429,
            message: "rate limited".into(),
        });
        assert_eq!(
            mapped,
            ProviderError::Api {
                status: 429,
                message: "rate limited".into()
            }
        );
    }

    #[test]
    fn parse_failures_become_invalid_response() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        assert!(matches!(
            ProviderError::from(ArkError::JsonParse(json_err)),
            ProviderError::InvalidResponse { .. }
        ));
        assert_eq!(
            map_error(ArkError::Timeout { seconds: 30 }),
            ProviderError::Timeout { seconds: 30 }
        );
    }
}
