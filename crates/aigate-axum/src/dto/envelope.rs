//! Success envelope and response payloads.

use aigate_core::TaskId;
use serde::Serialize;

/// Message used by most successful responses.
pub const SUCCESS_MESSAGE: &str = "success";

/// Message returned when a task is accepted.
pub const TASK_SUBMITTED_MESSAGE: &str = "任务已提交";

/// Uniform success envelope: `{code: 0, message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(SUCCESS_MESSAGE, data)
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data,
        }
    }
}

/// Payload of a synchronous call.
#[derive(Debug, Serialize)]
pub struct CallResult {
    pub result: String,
}

/// Payload of a task submission.
#[derive(Debug, Serialize)]
pub struct TaskSubmitted {
    pub task_id: TaskId,
}
