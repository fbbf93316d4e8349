//! Subcommands and their argument groups.

use std::time::Duration;

use aigate_ark::{
    ArkClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_STREAM_BUFFER,
};
use aigate_core::GatewaySettings;
use clap::{Args, Subcommand};

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve(ServeArgs),

    /// List the functions the gateway supports
    Functions,

    /// Invoke a function once and print the result
    Call {
        /// Function name (see `aigate functions`)
        function: String,
        /// Text to process
        content: String,
        /// Print output as it arrives instead of waiting for the full answer
        #[arg(long)]
        stream: bool,
        #[command(flatten)]
        ark: ArkArgs,
    },
}

/// Provider connection settings shared by `serve` and `call`.
#[derive(Debug, Clone, Args)]
pub struct ArkArgs {
    /// Ark API key
    #[arg(long = "api-key", env = "ARK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    #[arg(long, env = "ARK_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Ark API
    #[arg(long = "base-url", env = "ARK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Upper bound on generated tokens
    #[arg(long = "max-tokens", env = "ARK_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Capacity of the provider event channel
    #[arg(long = "stream-buffer", env = "ARK_STREAM_BUFFER", default_value_t = DEFAULT_STREAM_BUFFER)]
    pub stream_buffer: usize,

    /// Provider request timeout in seconds
    #[arg(
        long = "request-timeout-secs",
        env = "AIGATE_REQUEST_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,
}

impl ArkArgs {
    /// Client configuration for these arguments.
    #[must_use]
    pub fn client_config(&self) -> ArkClientConfig {
        ArkClientConfig::new()
            .with_optional_api_key(self.api_key.clone())
            .with_model(&self.model)
            .with_base_url(&self.base_url)
            .with_max_tokens(self.max_tokens)
            .with_stream_buffer(self.stream_buffer)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
    }
}

/// Arguments for `aigate serve`.
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "AIGATE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "AIGATE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Tasks allowed to call the provider at once
    #[arg(long = "max-concurrent-tasks")]
    pub max_concurrent_tasks: Option<usize>,

    /// Streams allowed to be open at once
    #[arg(long = "max-concurrent-streams")]
    pub max_concurrent_streams: Option<usize>,

    /// Seconds a finished task is kept before it is purged
    #[arg(long = "task-retention-secs", default_value_t = 600)]
    pub task_retention_secs: u64,

    /// Seconds between purge passes
    #[arg(long = "sweep-interval-secs", default_value_t = 600)]
    pub sweep_interval_secs: u64,

    /// Allowed CORS origin; repeat for several. Omit to allow all.
    #[arg(long = "allowed-origin")]
    pub allowed_origins: Vec<String>,

    #[command(flatten)]
    pub ark: ArkArgs,
}

impl ServeArgs {
    /// Gateway limits for these arguments.
    #[must_use]
    pub fn gateway_settings(&self) -> GatewaySettings {
        let mut settings = GatewaySettings::with_defaults()
            .with_task_retention(Duration::from_secs(self.task_retention_secs))
            .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs));
        if let Some(limit) = self.max_concurrent_tasks {
            settings = settings.with_max_concurrent_tasks(limit);
        }
        if let Some(limit) = self.max_concurrent_streams {
            settings = settings.with_max_concurrent_streams(limit);
        }
        settings
    }
}
