use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::LibraryDetail;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// POST /api/libraries - `{name, books?: [id, ...]}`
pub async fn create(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<LibraryDetail> {
    let Json(body) = body?;
    Ok(ApiResponse::created(state.catalog().create_library(&body).await?))
}
