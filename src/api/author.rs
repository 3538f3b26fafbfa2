use serde_json::Value;

use super::fields::FieldReader;
use crate::error::ApiError;

pub const MAX_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorPayload {
    pub name: String,
}

impl AuthorPayload {
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        let mut reader = FieldReader::new(body, false)?;
        let name = reader.string("name", MAX_NAME_LENGTH);
        reader.finish()?;
        match name {
            Some(name) => Ok(Self { name }),
            None => Err(ApiError::validation_error("Missing required fields", None)),
        }
    }
}
