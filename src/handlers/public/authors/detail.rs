use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::AuthorDetail;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/authors/:id - author with nested books
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<AuthorDetail> {
    let author = state.catalog().author_detail(record_id(&id)?).await?;
    Ok(ApiResponse::success(author))
}
