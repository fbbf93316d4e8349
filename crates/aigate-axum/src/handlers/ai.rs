//! Synchronous call and streaming handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Response;

use super::parse_request;
use crate::dto::{AiRequest, ApiResponse, CallResult};
use crate::error::HttpError;
use crate::sse::relay_response;
use crate::state::AppState;

/// Run a function and wait for the provider's answer.
pub async fn call(
    State(state): State<AppState>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CallResult>>, HttpError> {
    let req = parse_request(payload)?;
    let result = state.provider.call(&req.function, &req.content).await?;
    Ok(Json(ApiResponse::success(CallResult { result })))
}

/// Stream a function's output as server-sent events.
///
/// Malformed bodies get a JSON 400. Everything after that, including an
/// unknown function, is reported in-band.
pub async fn stream(
    State(state): State<AppState>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let req = parse_request(payload)?;

    let cancel = state.shutdown.child_token();
    let guard = cancel.clone().drop_guard();
    let events = state.streams.open(&req.function, &req.content, cancel);

    tracing::debug!(function = %req.function, "Stream opened");
    Ok(relay_response(events, guard))
}
