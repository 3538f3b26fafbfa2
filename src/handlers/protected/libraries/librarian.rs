use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::database::models::Librarian;
use crate::handlers::record_id;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// POST /api/libraries/:id/librarian - `{name}`; 409 once the library has one
pub async fn assign(
    Authenticated(_): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Librarian> {
    let id = record_id(&id)?;
    let catalog = state.catalog();
    catalog.get_library(id).await?;
    let Json(body) = body?;
    Ok(ApiResponse::created(catalog.assign_librarian(id, &body).await?))
}
