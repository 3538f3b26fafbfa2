use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Author;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// POST /api/authors - `{name}`
pub async fn create(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Author> {
    let Json(body) = body?;
    Ok(ApiResponse::created(state.catalog().create_author(&body).await?))
}
