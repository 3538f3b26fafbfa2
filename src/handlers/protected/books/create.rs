use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Book;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// POST /api/books - `{title, publication_year, author}`
pub async fn create(
    Authenticated(user): Authenticated,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Book> {
    let Json(body) = body?;
    let book = state.catalog().create_book(&body).await?;
    tracing::debug!("Book {} created by {}", book.id, user.username);
    Ok(ApiResponse::created(book))
}
