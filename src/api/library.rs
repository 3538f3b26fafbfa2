use serde_json::Value;

use super::author::MAX_NAME_LENGTH;
use super::fields::FieldReader;
use crate::error::ApiError;

/// Body of `POST /api/libraries`. `books` is optional and defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPayload {
    pub name: String,
    pub books: Vec<i64>,
}

impl LibraryPayload {
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        let mut reader = FieldReader::new(body, false)?;
        let name = reader.string("name", MAX_NAME_LENGTH);
        let books = match body.get("books") {
            Some(_) => reader.pk_list("books"),
            None => Some(Vec::new()),
        };
        reader.finish()?;
        match (name, books) {
            (Some(name), Some(books)) => Ok(Self { name, books }),
            _ => Err(ApiError::validation_error("Missing required fields", None)),
        }
    }
}

/// Body of `POST /api/libraries/:id/books`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldingPayload {
    pub book_id: i64,
}

impl HoldingPayload {
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        let mut reader = FieldReader::new(body, false)?;
        let book_id = reader.pk("book");
        reader.finish()?;
        book_id
            .map(|book_id| Self { book_id })
            .ok_or_else(|| ApiError::validation_error("Missing required fields", None))
    }
}

/// Body of `POST /api/libraries/:id/librarian`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarianPayload {
    pub name: String,
}

impl LibrarianPayload {
    pub fn from_value(body: &Value) -> Result<Self, ApiError> {
        let mut reader = FieldReader::new(body, false)?;
        let name = reader.string("name", MAX_NAME_LENGTH);
        reader.finish()?;
        name.map(|name| Self { name })
            .ok_or_else(|| ApiError::validation_error("Missing required fields", None))
    }
}
