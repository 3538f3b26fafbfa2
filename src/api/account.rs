use serde::Serialize;
use serde_json::Value;

use super::fields::FieldReader;
use crate::database::models::UserView;
use crate::error::ApiError;

pub const MAX_USERNAME_LENGTH: usize = 150;

/// Username and password from a register or login body.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        let mut reader = FieldReader::new(body, false)?;
        let username = reader.string("username", MAX_USERNAME_LENGTH);
        if let Some(name) = &username {
            if !is_valid_username(name) {
                reader.error(
                    "username",
                    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                );
            }
        }
        // Passwords are taken verbatim, never trimmed.
        let password = match body.get("password") {
            Some(Value::String(p)) if !p.is_empty() => Some(p.clone()),
            Some(Value::String(_)) => {
                reader.error("password", "This field may not be blank.");
                None
            }
            Some(_) => {
                reader.error("password", "Not a valid string.");
                None
            }
            None => {
                reader.error("password", super::fields::REQUIRED);
                None
            }
        };
        reader.finish()?;

        match (username, password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => Err(ApiError::validation_error("Missing required fields", None)),
        }
    }
}

fn is_valid_username(name: &str) -> bool {
    name.chars().all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: UserView,
}
