use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::api::Credentials;
use crate::app::AppState;
use crate::database::models::UserView;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /auth/register - create a regular (non-staff) account
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<UserView> {
    let Json(body) = body?;
    let credentials = Credentials::from_value(&body)?;
    let user = state.users().register(credentials, false, &state.config.security).await?;
    Ok(ApiResponse::created(UserView::from(&user)))
}
