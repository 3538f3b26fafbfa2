use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Book;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// PUT /api/books/:id - full replacement
pub async fn replace(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Book> {
    update(user.username, state, id, body, false).await
}

/// PATCH /api/books/:id - only the fields sent are validated and changed
pub async fn patch(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Book> {
    update(user.username, state, id, body, true).await
}

async fn update(
    username: String,
    state: AppState,
    id: String,
    body: Result<Json<Value>, JsonRejection>,
    partial: bool,
) -> ApiResult<Book> {
    let id = record_id(&id)?;
    let catalog = state.catalog();
    // An unknown id is reported before anything about the body
    catalog.get_book(id).await?;
    let Json(body) = body?;
    let book = catalog.update_book(id, &body, partial).await?;
    tracing::debug!("Book {} updated by {}", book.id, username);
    Ok(ApiResponse::success(book))
}
