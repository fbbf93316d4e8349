//! Function listing handler.

use aigate_core::Function;
use axum::Json;
use axum::extract::State;

use crate::dto::ApiResponse;
use crate::state::AppState;

/// List supported functions in registration order.
pub async fn list(State(state): State<AppState>) -> Json<ApiResponse<Vec<Function>>> {
    Json(ApiResponse::success(state.provider.functions()))
}
