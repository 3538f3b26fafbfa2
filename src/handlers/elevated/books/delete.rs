use axum::extract::{Path, State};

use crate::app::AppState;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult, Staff};

/// DELETE /api/books/:id - staff only, 204 on success
pub async fn delete(
    Staff(user): Staff,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = record_id(&id)?;
    state.catalog().delete_book(id).await?;
    tracing::info!("Book {} deleted by {}", id, user.username);
    Ok(ApiResponse::no_content())
}
