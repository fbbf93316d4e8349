//! Public configuration for the Ark client.

use std::time::Duration;

use tokio::sync::Semaphore;

/// Default Ark API root (Beijing region).
pub const DEFAULT_BASE_URL: &str = "https://ark.cn-beijing.volces.com/api/v3";

/// Default model endpoint.
pub const DEFAULT_MODEL: &str = "doubao-1-5-pro-32k-250115";

/// Default request timeout. Also bounds idle gaps while streaming.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default completion budget per request.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Default capacity of the per-stream event channel.
pub const DEFAULT_STREAM_BUFFER: usize = 1024;

/// Configuration for the Ark client.
///
/// # Example
///
/// ```
/// use aigate_ark::ArkClientConfig;
/// use std::time::Duration;
///
/// let config = ArkClientConfig::new()
///     .with_api_key("ak-...")
///     .with_model("doubao-1-5-lite-32k-250115")
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Clone)]
pub struct ArkClientConfig {
    /// API root; `/chat/completions` is appended
    pub(crate) base_url: String,
    /// Bearer credential
    pub(crate) api_key: Option<String>,
    /// Model or endpoint id
    pub(crate) model: String,
    /// Per-request timeout and streaming idle bound
    pub(crate) timeout: Duration,
    pub(crate) max_tokens: u32,
    pub(crate) stream_buffer: usize,
    pub(crate) user_agent: String,
}

impl Default for ArkClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            stream_buffer: DEFAULT_STREAM_BUFFER,
            user_agent: concat!("aigate-ark/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl std::fmt::Debug for ArkClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArkClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("max_tokens", &self.max_tokens)
            .field("stream_buffer", &self.stream_buffer)
            .finish_non_exhaustive()
    }
}

impl ArkClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API root. A trailing slash is ignored.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an optional API key.
    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds. While streaming, this bounds the gap between
    /// two reads rather than the whole response.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the capacity of each stream's event channel.
    ///
    /// Clamped to `1..=Semaphore::MAX_PERMITS`, the range `mpsc::channel` accepts.
    #[must_use]
    pub fn with_stream_buffer(mut self, capacity: usize) -> Self {
        self.stream_buffer = capacity.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full chat completions endpoint.
    pub(crate) fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
