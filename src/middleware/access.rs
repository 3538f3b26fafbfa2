use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::auth::AuthUser;
use crate::error::ApiError;

/// The three access tiers endpoints are gated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Anyone may call.
    PublicRead,
    /// Any authenticated caller.
    Authenticated,
    /// Staff only. Anonymous callers get 401, other users 403.
    Staff,
}

impl AccessRule {
    pub fn check(&self, user: Option<&AuthUser>) -> Result<(), ApiError> {
        match (self, user) {
            (AccessRule::PublicRead, _) => Ok(()),
            (_, None) => Err(ApiError::not_authenticated()),
            (AccessRule::Authenticated, Some(_)) => Ok(()),
            (AccessRule::Staff, Some(user)) if user.is_staff => Ok(()),
            (AccessRule::Staff, Some(user)) => {
                tracing::warn!("User '{}' denied staff-only action", user.username);
                Err(ApiError::permission_denied())
            }
        }
    }
}

fn require(rule: AccessRule, parts: &Parts) -> Result<AuthUser, ApiError> {
    let user = parts.extensions.get::<AuthUser>();
    rule.check(user)?;
    user.cloned().ok_or_else(ApiError::not_authenticated)
}

/// Extractor for handlers behind `AccessRule::Authenticated`.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require(AccessRule::Authenticated, parts).map(Authenticated)
    }
}

/// Extractor for handlers behind `AccessRule::Staff`.
#[derive(Debug, Clone)]
pub struct Staff(pub AuthUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Staff {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require(AccessRule::Staff, parts).map(Staff)
    }
}
