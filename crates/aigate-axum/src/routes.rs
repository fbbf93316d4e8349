//! Route definitions and router construction.
//!
//! This module defines the HTTP routes and creates the main router.
//! Handlers delegate to the core services held in `AxumContext`.

use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::bootstrap::{AxumContext, CorsConfig};
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build all API routes without the `/api/v1` prefix.
///
/// Returns a router typed as `Router<AppState>` WITHOUT `.with_state()`
/// applied; the caller applies state before nesting.
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/functions", get(handlers::functions::list))
        .route("/ai/call", post(handlers::ai::call))
        .route("/ai/stream", post(handlers::ai::stream))
        .route("/ai/task", post(handlers::tasks::submit))
        .route("/ai/task/{task_id}", get(handlers::tasks::get))
}

/// Create the main Axum router.
///
/// # Path Parameter Syntax
/// Axum 0.8 uses brace syntax for path parameters: `{task_id}`
pub fn create_router(ctx: AxumContext, cors_config: &CorsConfig) -> Router {
    let state: AppState = Arc::new(ctx);
    let cors = build_cors_layer(cors_config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes().with_state(state).layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint.
pub(crate) async fn health_check() -> &'static str {
    "OK"
}
