//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the Axum web adapter. All concrete implementations are instantiated here.

use std::sync::Arc;

use aigate_ark::{ArkClient, ArkClientConfig};
use aigate_core::ports::ChatCompletionPort;
use aigate_core::{
    FunctionRegistry, GatewaySettings, ProviderClient, StreamRelay, TaskService,
    validate_settings,
};
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// Task and stream limits.
    pub gateway: GatewaySettings,
    /// Provider client configuration.
    pub ark: ArkClientConfig,
}

impl ServerConfig {
    /// Create config with defaults. The provider credential still has to be set.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: CorsConfig::default(),
            gateway: GatewaySettings::with_defaults(),
            ark: ArkClientConfig::new(),
        }
    }

    /// Set CORS to allow specific origins. An empty list allows all.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = if origins.is_empty() {
            CorsConfig::AllowAll
        } else {
            CorsConfig::AllowOrigins(origins)
        };
        self
    }

    /// Socket address string to bind.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application context for the Axum adapter.
///
/// Holds every process-scoped service; handlers reach it through `AppState`.
#[derive(Debug)]
pub struct AxumContext {
    /// Function-aware provider client.
    pub provider: ProviderClient,
    /// Async task submission and lookup.
    pub tasks: TaskService,
    /// Per-request stream relays.
    pub streams: StreamRelay,
    /// Root token; stream relays and tasks are cancelled through it.
    pub shutdown: CancellationToken,
}

impl AxumContext {
    /// Wire the core services around a provider port.
    pub fn new(
        port: Arc<dyn ChatCompletionPort>,
        settings: &GatewaySettings,
        shutdown: CancellationToken,
    ) -> Self {
        let provider = ProviderClient::new(Arc::new(FunctionRegistry::builtin()), port);
        let tasks = TaskService::new(provider.clone(), settings, shutdown.clone());
        let streams = StreamRelay::new(provider.clone(), settings);
        Self {
            provider,
            tasks,
            streams,
            shutdown,
        }
    }
}

/// Bootstrap the Axum server with all services.
///
/// Fails when the settings are invalid or the provider credential is missing.
pub fn bootstrap(config: &ServerConfig, shutdown: CancellationToken) -> Result<AxumContext> {
    validate_settings(&config.gateway).context("Invalid gateway settings")?;

    let ark = ArkClient::new(config.ark.clone()).context("Failed to create Ark client")?;

    tracing::info!(
        target: "aigate.bootstrap",
        base_url = %config.ark.base_url(),
        model = %config.ark.model(),
        max_concurrent_tasks = config.gateway.max_concurrent_tasks,
        max_concurrent_streams = config.gateway.max_concurrent_streams,
        task_retention_secs = config.gateway.task_retention.as_secs(),
        "Provider configured"
    );

    Ok(AxumContext::new(Arc::new(ark), &config.gateway, shutdown))
}

/// Start the web server and run until `shutdown` fires.
pub async fn start_server(config: ServerConfig, shutdown: CancellationToken) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let ctx = bootstrap(&config, shutdown.clone())?;
    let sweeper = ctx.tasks.spawn_sweeper();

    let app = crate::routes::create_router(ctx, &config.cors);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("aigate listening on http://{}", addr);

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { signal.cancelled().await })
        .await
        .context("HTTP server error")?;

    // Stop the sweeper even when the server exited on its own.
    shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!("Task sweeper ended abnormally: {}", e);
    }
    info!("aigate stopped");
    Ok(())
}
