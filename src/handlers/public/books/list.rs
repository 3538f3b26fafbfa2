use axum::extract::{RawQuery, State};

use crate::app::AppState;
use crate::database::models::Book;
use crate::filter::FilterData;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/books - list with `title`, `author`, `author_name`, `publication_year`, `search` and `ordering`
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Book>> {
    let books = state.catalog().list_books(FilterData::from_query(query.as_deref())).await?;
    Ok(ApiResponse::success(books))
}
