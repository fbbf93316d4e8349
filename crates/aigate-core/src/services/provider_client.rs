//! Provider client - resolves functions and delegates to the provider port.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::{Function, FunctionRegistry, ProviderEvent};
use crate::ports::{ChatCompletionPort, CoreError};

/// Function-aware front of the chat completion port.
///
/// Cheap to clone; the registry and the port handle are shared.
#[derive(Clone)]
pub struct ProviderClient {
    registry: Arc<FunctionRegistry>,
    port: Arc<dyn ChatCompletionPort>,
}

impl ProviderClient {
    /// Create a new provider client.
    pub fn new(registry: Arc<FunctionRegistry>, port: Arc<dyn ChatCompletionPort>) -> Self {
        Self { registry, port }
    }

    /// The function registry this client resolves against.
    #[must_use]
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Public listing of supported functions.
    #[must_use]
    pub fn functions(&self) -> Vec<Function> {
        self.registry.list()
    }

    /// Validate a request without calling the provider.
    pub fn validate(&self, function: &str, content: &str) -> Result<(), CoreError> {
        self.registry.build_prompt(function, content)?;
        Ok(())
    }

    /// Run `function` over `content` and wait for the full response.
    pub async fn call(&self, function: &str, content: &str) -> Result<String, CoreError> {
        let prompt = self.registry.build_prompt(function, content)?;
        tracing::debug!(function = %function, prompt_len = prompt.len(), "Calling provider");

        self.port.complete(&prompt).await.map_err(|e| {
            tracing::warn!(function = %function, error = %e, "Provider call failed");
            CoreError::from(e)
        })
    }

    /// Open a provider stream for `function` over `content`.
    ///
    /// Validation and open failures are returned here; failures after the
    /// stream is open arrive in-band.
    pub async fn stream(
        &self,
        function: &str,
        content: &str,
    ) -> Result<mpsc::Receiver<ProviderEvent>, CoreError> {
        let prompt = self.registry.build_prompt(function, content)?;
        tracing::debug!(function = %function, prompt_len = prompt.len(), "Opening provider stream");

        self.port.stream(&prompt).await.map_err(|e| {
            tracing::warn!(function = %function, error = %e, "Provider stream failed to open");
            CoreError::from(e)
        })
    }
}

impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("functions", &self.registry.list().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SUMMARIZE, TRANSLATE_ZH_TO_EN};
    use crate::ports::{MockChatCompletionPort, ProviderError};

    fn client(port: MockChatCompletionPort) -> ProviderClient {
        ProviderClient::new(Arc::new(FunctionRegistry::builtin()), Arc::new(port))
    }

    #[tokio::test]
    async fn call_sends_rendered_prompt() {
        let mut port = MockChatCompletionPort::new();
        port.expect_complete()
            .withf(|prompt: &str| {
                prompt.starts_with("请将以下中文翻译成英文") && prompt.ends_with("\n你好")
            })
            .times(1)
            .returning(|_| Ok("Hello".to_string()));

        let result = client(port).call(TRANSLATE_ZH_TO_EN, "你好").await.unwrap();
        assert_eq!(result, "Hello");
    }

    #[tokio::test]
    async fn unsupported_function_never_reaches_provider() {
        let mut port = MockChatCompletionPort::new();
        port.expect_complete().never();
        port.expect_stream().never();
        let client = client(port);

        let err = client.call("poetry", "roses").await.unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedFunction(ref name) if name == "poetry"));

        let err = client.stream("poetry", "roses").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn blank_content_is_a_validation_error() {
        let mut port = MockChatCompletionPort::new();
        port.expect_complete().never();

        let err = client(port).call(SUMMARIZE, "   ").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn provider_error_keeps_its_message() {
        let mut port = MockChatCompletionPort::new();
        port.expect_complete().returning(|_| {
            Err(ProviderError::Api {
                status: 429,
                message: "quota exceeded".into(),
            })
        });

        let err = client(port).call(SUMMARIZE, "text").await.unwrap_err();
        assert!(matches!(err, CoreError::Provider(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn validate_checks_without_calling() {
        let client = client(MockChatCompletionPort::new());
        assert!(client.validate(SUMMARIZE, "x").is_ok());
        assert!(client.validate("nope", "x").is_err());
        assert_eq!(client.functions().len(), 3);
    }
}
