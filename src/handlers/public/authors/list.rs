use axum::extract::State;

use crate::app::AppState;
use crate::database::models::Author;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/authors - all authors by name
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Author>> {
    Ok(ApiResponse::success(state.catalog().list_authors().await?))
}
