use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Author, Book, Librarian, Library, NewBook, NewUser, User};
use crate::filter::Filter;

/// Persistence seam for the catalog and its accounts.
///
/// Implementations must apply `Filter` semantics identically: exact
/// matches, AND-ed search terms over title and author name, and the
/// filter's ordering with record id as the final tie-break.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Release pooled connections on shutdown.
    async fn close(&self) {}

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn list_books(&self, filter: &Filter) -> Result<Vec<Book>, DatabaseError>;
    async fn get_book(&self, id: i64) -> Result<Option<Book>, DatabaseError>;
    async fn create_book(&self, book: NewBook) -> Result<Book, DatabaseError>;
    /// Replace all fields. `None` when the id does not exist.
    async fn update_book(&self, id: i64, book: NewBook) -> Result<Option<Book>, DatabaseError>;
    /// `false` when the id does not exist.
    async fn delete_book(&self, id: i64) -> Result<bool, DatabaseError>;
    async fn count_books(&self) -> Result<i64, DatabaseError>;

    async fn list_authors(&self) -> Result<Vec<Author>, DatabaseError>;
    async fn get_author(&self, id: i64) -> Result<Option<Author>, DatabaseError>;
    async fn create_author(&self, name: String) -> Result<Author, DatabaseError>;
    /// Books owned by the author, ordered by title then id.
    async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>, DatabaseError>;

    /// Libraries ordered by name then id.
    async fn list_libraries(&self) -> Result<Vec<Library>, DatabaseError>;
    async fn get_library(&self, id: i64) -> Result<Option<Library>, DatabaseError>;
    async fn create_library(&self, name: String) -> Result<Library, DatabaseError>;
    /// Link a book into a library's holdings. Linking twice is a no-op;
    /// a missing library or book fails with `DatabaseError::NotFound`.
    async fn add_library_book(&self, library_id: i64, book_id: i64) -> Result<(), DatabaseError>;
    /// Books held by the library, ordered by title then id.
    async fn library_books(&self, library_id: i64) -> Result<Vec<Book>, DatabaseError>;
    async fn get_librarian(&self, library_id: i64) -> Result<Option<Librarian>, DatabaseError>;
    /// Fails with `DatabaseError::Conflict` when the library already has a librarian.
    async fn create_librarian(&self, library_id: i64, name: String) -> Result<Librarian, DatabaseError>;

    /// Fails with `DatabaseError::Conflict` when the username is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}
