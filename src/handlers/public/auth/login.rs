use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::api::{Credentials, TokenResponse};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /auth/login - exchange username and password for a bearer token
///
/// ```json
/// { "username": "testuser", "password": "password123" }
/// ```
///
/// Responds with `{token, token_type, expires_in, user}`; bad credentials are 401.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(body) = body?;
    let credentials = Credentials::from_value(&body)?;

    let users = state.users();
    let user = users.authenticate(&credentials).await?;
    let token = users.issue_token(&user, &state.config.security)?;

    tracing::info!("Issued token for {}", user.username);
    Ok(ApiResponse::success(token))
}
