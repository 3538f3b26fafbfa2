use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::Book;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/books/:id
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Book> {
    let book = state.catalog().get_book(record_id(&id)?).await?;
    Ok(ApiResponse::success(book))
}
