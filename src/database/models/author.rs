use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::book::Book;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
}

/// Author with its books nested, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorDetail {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        Self {
            id: author.id,
            name: author.name,
            books,
        }
    }
}
