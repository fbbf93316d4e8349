//! Async task handlers.

use aigate_core::{Task, TaskId};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};

use super::parse_request;
use crate::dto::envelope::TASK_SUBMITTED_MESSAGE;
use crate::dto::{AiRequest, ApiResponse, TaskSubmitted};
use crate::error::HttpError;
use crate::state::AppState;

/// Submit a task. Returns its id without waiting for the provider.
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<TaskSubmitted>>, HttpError> {
    let req = parse_request(payload)?;
    let task_id = state.tasks.submit(&req.function, &req.content).await?;
    Ok(Json(ApiResponse::with_message(
        TASK_SUBMITTED_MESSAGE,
        TaskSubmitted { task_id },
    )))
}

/// Poll a task by id.
pub async fn get(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<ApiResponse<Task>>, HttpError> {
    let task_id = TaskId::from(task_id);
    let task = state
        .tasks
        .get(&task_id)
        .await
        .ok_or_else(|| HttpError::NotFound(format!("Task not found: {task_id}")))?;
    Ok(Json(ApiResponse::success(task)))
}
