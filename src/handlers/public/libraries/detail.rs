use axum::extract::{Path, State};

use crate::app::AppState;
use crate::database::models::LibraryDetail;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/libraries/:id - library with its books and librarian
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<LibraryDetail> {
    let library = state.catalog().library_detail(record_id(&id)?).await?;
    Ok(ApiResponse::success(library))
}
