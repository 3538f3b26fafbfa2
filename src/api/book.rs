use chrono::{Datelike, Utc};
use serde_json::Value;

use super::fields::FieldReader;
use crate::database::models::{Book, NewBook};
use crate::error::ApiError;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const FUTURE_YEAR: &str = "Publication year cannot be in the future.";

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Book fields accepted on create and update.
///
/// Author existence is not checked here; that needs the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPayload {
    pub title: Option<String>,
    pub publication_year: Option<i32>,
    pub author: Option<i64>,
}

impl BookPayload {
    /// Parse a body. With `partial` absent fields are allowed.
    pub fn from_value(body: &Value, partial: bool, current_year: i32) -> Result<Self, ApiError> {
        let mut reader = FieldReader::new(body, partial)?;
        let title = reader.string("title", MAX_TITLE_LENGTH);
        let publication_year = reader.integer("publication_year");
        if let Some(year) = publication_year {
            if year > current_year {
                reader.error("publication_year", FUTURE_YEAR);
            }
        }
        let author = reader.pk("author");
        reader.finish()?;

        Ok(Self {
            title,
            publication_year,
            author,
        })
    }

    /// Full replacement values. Fields missing here come from `existing`.
    pub fn merge(self, existing: Option<&Book>) -> Result<NewBook, ApiError> {
        let base = existing.map(Book::to_new);
        let title = self.title.or_else(|| base.as_ref().map(|b| b.title.clone()));
        let publication_year = self.publication_year.or_else(|| base.as_ref().map(|b| b.publication_year));
        let author_id = self.author.or_else(|| base.as_ref().map(|b| b.author_id));

        match (title, publication_year, author_id) {
            (Some(title), Some(publication_year), Some(author_id)) => Ok(NewBook {
                title,
                publication_year,
                author_id,
            }),
            _ => Err(ApiError::validation_error("Missing required fields", None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_a_complete_payload() {
        let body = json!({"title": "Fantastic Beasts", "publication_year": 2001, "author": 1});
        let payload = BookPayload::from_value(&body, false, 2024).unwrap();
        let new = payload.merge(None).unwrap();
        assert_eq!(
            new,
            NewBook { title: "Fantastic Beasts".into(), publication_year: 2001, author_id: 1 }
        );
    }

    #[test]
    fn rejects_future_years() {
        let body = json!({"title": "Tomorrow", "publication_year": 2025, "author": 1});
        let err = BookPayload::from_value(&body, false, 2024).unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["publication_year"], FUTURE_YEAR);
    }

    #[test]
    fn current_year_is_allowed() {
        let body = json!({"title": "Now", "publication_year": 2024, "author": 1});
        assert!(BookPayload::from_value(&body, false, 2024).is_ok());
    }

    #[test]
    fn reports_every_missing_field() {
        let err = BookPayload::from_value(&json!({}), false, 2024).unwrap_err();
        let body = err.to_json();
        for field in ["title", "publication_year", "author"] {
            assert_eq!(body["field_errors"][field], "This field is required.");
        }
    }

    #[test]
    fn partial_payload_merges_onto_existing() {
        let existing = Book { id: 1, title: "Harry Potter".into(), publication_year: 1997, author_id: 1 };
        let payload = BookPayload::from_value(&json!({"title": "Harry Potter and the Philosopher's Stone"}), true, 2024)
            .unwrap();
        let merged = payload.merge(Some(&existing)).unwrap();
        assert_eq!(merged.title, "Harry Potter and the Philosopher's Stone");
        assert_eq!(merged.publication_year, 1997);
        assert_eq!(merged.author_id, 1);
    }

    #[test]
    fn partial_payload_still_checks_year() {
        let err = BookPayload::from_value(&json!({"publication_year": 3000}), true, 2024).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
