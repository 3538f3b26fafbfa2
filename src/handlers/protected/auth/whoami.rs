use crate::database::models::UserView;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};

/// GET /api/auth/whoami - the caller as seen by the server
pub async fn whoami(Authenticated(user): Authenticated) -> ApiResult<UserView> {
    Ok(ApiResponse::success(UserView {
        id: user.id,
        username: user.username,
        is_staff: user.is_staff,
    }))
}
