use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{Credentials, TokenResponse};
use crate::auth::{self, Claims};
use crate::config::SecurityConfig;
use crate::database::models::{NewUser, User, UserView};
use crate::database::{CatalogStore, DatabaseError};
use crate::error::ApiError;

/// Account registration, password login and token issuance.
pub struct UserService {
    store: Arc<dyn CatalogStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn register(
        &self,
        credentials: Credentials,
        is_staff: bool,
        security: &SecurityConfig,
    ) -> Result<User, ApiError> {
        auth::validate_password(&credentials.password, security.password_min_length)?;
        let password_hash = hash_blocking(credentials.password).await?;

        let user = self
            .store
            .create_user(NewUser {
                username: credentials.username,
                password_hash,
                is_staff,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => ApiError::conflict("A user with that username already exists."),
                other => other.into(),
            })?;

        info!(user_id = user.id, username = %user.username, is_staff, "Registered user");
        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords look the same.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let invalid = || ApiError::unauthorized("Invalid username or password.");
        let user = self
            .store
            .find_user_by_username(&credentials.username)
            .await?
            .ok_or_else(invalid)?;

        let password = credentials.password.clone();
        let hash = user.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
            .await
            .map_err(|e| ApiError::internal_server_error(format!("password check failed: {}", e)))?;

        if verified {
            Ok(user)
        } else {
            warn!(username = %credentials.username, "Failed login attempt");
            Err(invalid())
        }
    }

    pub fn issue_token(&self, user: &User, security: &SecurityConfig) -> Result<TokenResponse, ApiError> {
        let hours = security.token_lifetime_hours();
        let claims = Claims::new(user, hours);
        let token = auth::generate_jwt(&claims, security)?;
        Ok(TokenResponse {
            token,
            token_type: "Bearer",
            expires_in: hours * 3600,
            user: UserView::from(user),
        })
    }

    /// Create the configured staff account if it does not exist yet.
    pub async fn ensure_admin(&self, security: &SecurityConfig) -> Result<Option<User>, ApiError> {
        let (Some(username), Some(password)) = (&security.admin_username, &security.admin_password) else {
            return Ok(None);
        };

        if let Some(existing) = self.store.find_user_by_username(username).await? {
            if !existing.is_staff {
                warn!(username = %username, "Bootstrap admin exists but is not staff; leaving it unchanged");
            }
            return Ok(None);
        }

        let credentials = Credentials {
            username: username.clone(),
            password: password.clone(),
        };
        self.register(credentials, true, security).await.map(Some)
    }
}

async fn hash_blocking(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .map_err(|e| ApiError::internal_server_error(format!("password hashing failed: {}", e)))?
        .map_err(ApiError::from)
}
