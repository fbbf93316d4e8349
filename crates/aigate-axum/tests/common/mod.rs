//! Shared fixtures for aigate-axum integration tests.

#![allow(dead_code)]

pub mod provider;

use std::sync::Arc;

use aigate_axum::bootstrap::{AxumContext, CorsConfig};
use aigate_axum::routes::create_router;
use aigate_core::GatewaySettings;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use provider::FakeProvider;

/// Router over `provider` with default limits.
pub fn app(provider: FakeProvider) -> Router {
    app_with_cors(provider, &CorsConfig::AllowAll)
}

pub fn app_with_cors(provider: FakeProvider, cors: &CorsConfig) -> Router {
    let ctx = AxumContext::new(
        Arc::new(provider),
        &GatewaySettings::with_defaults(),
        CancellationToken::new(),
    );
    create_router(ctx, cors)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, &body.to_string())
}

pub fn post_raw(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Send a request and decode the JSON envelope.
pub async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("not JSON ({e}): {}", String::from_utf8_lossy(&bytes)));
    (status, json)
}

/// Read a whole SSE body and return the `data:` payloads in order.
pub async fn sse_payloads(response: Response) -> Vec<String> {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    text.lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(str::to_string)
        .collect()
}
