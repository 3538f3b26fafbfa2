use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;

/// Authenticated caller, resolved from the bearer token and the user store
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// Resolves an optional bearer token into an `AuthUser` request extension.
///
/// Requests without an Authorization header pass through anonymously; a
/// header that is present but unusable is rejected with 401 on every route.
pub async fn authenticate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(token) = extract_jwt_from_headers(request.headers())? {
        let claims = auth::validate_jwt(&token, &state.config.security)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| ApiError::unauthorized("Invalid token subject."))?;

        // The store is authoritative for existence and the staff flag
        let user = state.store.find_user_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!("Token for user '{}' (ID: {}) refers to a missing account", claims.username, user_id);
            ApiError::unauthorized("User not found.")
        })?;

        tracing::debug!("Authenticated {} (staff: {})", user.username, user.is_staff);
        request.extensions_mut().insert(AuthUser::from(&user));
    }

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header, if one was sent
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err(ApiError::unauthorized("Empty bearer token")),
        None => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}
