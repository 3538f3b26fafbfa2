use axum::extract::{RawQuery, State};

use crate::app::AppState;
use crate::database::models::Library;
use crate::filter::query_value;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/libraries - all libraries by name, `?name=` for an exact match
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Library>> {
    let name = query_value(query.as_deref(), "name");
    Ok(ApiResponse::success(state.catalog().list_libraries(name.as_deref()).await?))
}
