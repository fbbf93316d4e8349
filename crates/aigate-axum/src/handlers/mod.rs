//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers that delegate to the core services.

pub mod ai;
pub mod functions;
pub mod tasks;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::dto::AiRequest;
use crate::error::HttpError;

/// Unwrap a JSON body and reject blank `function` or `content`.
pub(crate) fn parse_request(
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<AiRequest, HttpError> {
    let Json(req) = payload?;
    if let Some(field) = req.missing_field() {
        return Err(HttpError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(req)
}
