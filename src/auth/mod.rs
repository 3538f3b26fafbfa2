pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{SecurityConfig, MAX_JWT_EXPIRY_HOURS};
use crate::database::models::User;

pub use password::{hash_password, validate_password, verify_password, PasswordError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string, per the JWT `sub` convention.
    pub sub: String,
    pub username: String,
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user: &User, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let hours = expiry_hours.clamp(1, MAX_JWT_EXPIRY_HOURS) as i64;
        let exp = (now + Duration::hours(hours)).timestamp();

        Self {
            sub: user.id.to_string(),
            username: user.username.clone(),
            jti: Uuid::new_v4(),
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn user() -> User {
        User {
            id: 42,
            username: "testuser".to_string(),
            password_hash: String::new(),
            is_staff: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn round_trips_claims() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(&user(), 1), &security).unwrap();
        let claims = validate_jwt(&token, &security).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.username, "testuser");
    }

    #[test]
    fn rejects_tokens_signed_with_another_secret() {
        let security = AppConfig::development().security;
        let token = generate_jwt(&Claims::new(&user(), 1), &security).unwrap();
        let mut other = security.clone();
        other.jwt_secret = "another-secret".to_string();
        assert!(matches!(validate_jwt(&token, &other), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_tokens() {
        let security = AppConfig::development().security;
        let mut claims = Claims::new(&user(), 1);
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt(&claims, &security).unwrap();
        assert!(validate_jwt(&token, &security).is_err());
    }

    #[test]
    fn huge_expiry_is_clamped() {
        let claims = Claims::new(&user(), u64::MAX);
        assert_eq!(claims.exp - claims.iat, (MAX_JWT_EXPIRY_HOURS * 3600) as i64);
    }

    #[test]
    fn refuses_to_sign_without_secret() {
        let security = AppConfig::production().security;
        assert!(matches!(
            generate_jwt(&Claims::new(&user(), 1), &security),
            Err(JwtError::InvalidSecret)
        ));
    }
}
