use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog row. Serialized with the owning author's id under `author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub publication_year: i32,
    #[serde(rename = "author")]
    pub author_id: i64,
}

/// Validated field values for inserting or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub publication_year: i32,
    pub author_id: i64,
}

impl Book {
    pub fn from_new(id: i64, new: NewBook) -> Self {
        Self {
            id,
            title: new.title,
            publication_year: new.publication_year,
            author_id: new.author_id,
        }
    }

    pub fn to_new(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            publication_year: self.publication_year,
            author_id: self.author_id,
        }
    }
}
