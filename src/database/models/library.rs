use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::book::Book;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Library {
    pub id: i64,
    pub name: String,
}

/// Staff member assigned to a library. Each library has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Librarian {
    pub id: i64,
    pub name: String,
    #[serde(rename = "library")]
    pub library_id: i64,
}

/// Library with its holdings and librarian nested, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryDetail {
    pub id: i64,
    pub name: String,
    pub books: Vec<Book>,
    pub librarian: Option<Librarian>,
}

impl LibraryDetail {
    pub fn new(library: Library, books: Vec<Book>, librarian: Option<Librarian>) -> Self {
        Self {
            id: library.id,
            name: library.name,
            books,
            librarian,
        }
    }
}
