use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::LibraryDetail;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// POST /api/libraries/:id/books - `{book}`; linking a held book again is a no-op
pub async fn add_book(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<LibraryDetail> {
    let id = record_id(&id)?;
    let catalog = state.catalog();
    catalog.get_library(id).await?;
    let Json(body) = body?;
    Ok(ApiResponse::success(catalog.add_library_book(id, &body).await?))
}
