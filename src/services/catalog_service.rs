use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::api::{current_year, AuthorPayload, BookPayload, HoldingPayload, LibrarianPayload, LibraryPayload};
use crate::database::models::{Author, AuthorDetail, Book, Librarian, Library, LibraryDetail};
use crate::database::{CatalogStore, DatabaseError};
use crate::error::ApiError;
use crate::filter::{Filter, FilterData};

/// Book and author operations on top of a `CatalogStore`.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list_books(&self, query: FilterData) -> Result<Vec<Book>, ApiError> {
        let filter = Filter::new().assign(query)?;
        Ok(self.store.list_books(&filter).await?)
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, ApiError> {
        self.store
            .get_book(id)
            .await?
            .ok_or_else(|| book_not_found(id))
    }

    pub async fn create_book(&self, body: &Value) -> Result<Book, ApiError> {
        let new = BookPayload::from_value(body, false, current_year())?.merge(None)?;
        self.ensure_author(new.author_id).await?;
        let book = self.store.create_book(new).await?;
        info!(book_id = book.id, title = %book.title, "Created book");
        Ok(book)
    }

    /// Replace (`partial == false`) or patch a book. Missing ids are reported before validation.
    pub async fn update_book(&self, id: i64, body: &Value, partial: bool) -> Result<Book, ApiError> {
        let existing = self.get_book(id).await?;
        let new = BookPayload::from_value(body, partial, current_year())?.merge(Some(&existing))?;
        self.ensure_author(new.author_id).await?;
        let book = self
            .store
            .update_book(id, new)
            .await?
            .ok_or_else(|| book_not_found(id))?;
        info!(book_id = book.id, "Updated book");
        Ok(book)
    }

    pub async fn delete_book(&self, id: i64) -> Result<(), ApiError> {
        if !self.store.delete_book(id).await? {
            return Err(book_not_found(id));
        }
        info!(book_id = id, "Deleted book");
        Ok(())
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>, ApiError> {
        Ok(self.store.list_authors().await?)
    }

    pub async fn author_detail(&self, id: i64) -> Result<AuthorDetail, ApiError> {
        let author = self
            .store
            .get_author(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Author {} not found.", id)))?;
        let books = self.store.books_by_author(id).await?;
        Ok(AuthorDetail::new(author, books))
    }

    pub async fn create_author(&self, body: &Value) -> Result<Author, ApiError> {
        let payload = AuthorPayload::from_value(body)?;
        let author = self.store.create_author(payload.name).await?;
        info!(author_id = author.id, name = %author.name, "Created author");
        Ok(author)
    }

    /// Libraries by name, optionally restricted to an exact name.
    pub async fn list_libraries(&self, name: Option<&str>) -> Result<Vec<Library>, ApiError> {
        let libraries = self.store.list_libraries().await?;
        Ok(match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => libraries.into_iter().filter(|l| l.name == name).collect(),
            None => libraries,
        })
    }

    pub async fn get_library(&self, id: i64) -> Result<Library, ApiError> {
        self.store
            .get_library(id)
            .await?
            .ok_or_else(|| library_not_found(id))
    }

    pub async fn library_detail(&self, id: i64) -> Result<LibraryDetail, ApiError> {
        let library = self.get_library(id).await?;
        let books = self.store.library_books(id).await?;
        let librarian = self.store.get_librarian(id).await?;
        Ok(LibraryDetail::new(library, books, librarian))
    }

    pub async fn create_library(&self, body: &Value) -> Result<LibraryDetail, ApiError> {
        let payload = LibraryPayload::from_value(body)?;
        for &book_id in &payload.books {
            self.ensure_book("books", book_id).await?;
        }
        let library = self.store.create_library(payload.name).await?;
        for &book_id in &payload.books {
            self.store.add_library_book(library.id, book_id).await?;
        }
        info!(library_id = library.id, name = %library.name, books = payload.books.len(), "Created library");
        self.library_detail(library.id).await
    }

    /// Add a book to the holdings of an existing library.
    pub async fn add_library_book(&self, id: i64, body: &Value) -> Result<LibraryDetail, ApiError> {
        let payload = HoldingPayload::from_value(body)?;
        self.ensure_book("book", payload.book_id).await?;
        self.store.add_library_book(id, payload.book_id).await?;
        info!(library_id = id, book_id = payload.book_id, "Added book to library");
        self.library_detail(id).await
    }

    pub async fn assign_librarian(&self, id: i64, body: &Value) -> Result<Librarian, ApiError> {
        let payload = LibrarianPayload::from_value(body)?;
        let librarian = match self.store.create_librarian(id, payload.name).await {
            Ok(librarian) => librarian,
            Err(DatabaseError::Conflict(_)) => {
                return Err(ApiError::conflict("This library already has a librarian."));
            }
            Err(err) => return Err(err.into()),
        };
        info!(library_id = id, librarian_id = librarian.id, "Assigned librarian");
        Ok(librarian)
    }

    async fn ensure_book(&self, field: &str, book_id: i64) -> Result<(), ApiError> {
        match self.store.get_book(book_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::field_error(
                field,
                format!("Invalid pk \"{}\" - object does not exist.", book_id),
            )),
        }
    }

    async fn ensure_author(&self, author_id: i64) -> Result<(), ApiError> {
        match self.store.get_author(author_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::field_error(
                "author",
                format!("Invalid pk \"{}\" - object does not exist.", author_id),
            )),
        }
    }
}

fn book_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Book {} not found.", id))
}

fn library_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Library {} not found.", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn seeded() -> (CatalogService, Author) {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
        let service = CatalogService::new(store);
        let author = service.create_author(&json!({"name": "J.K. Rowling"})).await.unwrap();
        (service, author)
    }

    #[tokio::test]
    async fn create_rejects_unknown_author() {
        let (service, _) = seeded().await;
        let err = service
            .create_book(&json!({"title": "Nobody's Book", "publication_year": 2000, "author": 99}))
            .await
            .unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["author"], "Invalid pk \"99\" - object does not exist.");
    }

    #[tokio::test]
    async fn update_reports_missing_before_invalid() {
        let (service, _) = seeded().await;
        let err = service.update_book(5, &json!({}), false).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn future_year_is_rejected_on_update() {
        let (service, author) = seeded().await;
        let book = service
            .create_book(&json!({"title": "Harry Potter", "publication_year": 1997, "author": author.id}))
            .await
            .unwrap();
        let err = service
            .update_book(book.id, &json!({"publication_year": current_year() + 1}), true)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(service.get_book(book.id).await.unwrap().publication_year, 1997);
    }

    #[tokio::test]
    async fn author_detail_nests_books_by_title() {
        let (service, author) = seeded().await;
        for (title, year) in [("Harry Potter", 1997), ("Fantastic Beasts", 2001)] {
            service
                .create_book(&json!({"title": title, "publication_year": year, "author": author.id}))
                .await
                .unwrap();
        }
        let detail = service.author_detail(author.id).await.unwrap();
        let titles: Vec<_> = detail.books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Fantastic Beasts", "Harry Potter"]);
    }

    #[tokio::test]
    async fn delete_twice_is_not_found() {
        let (service, author) = seeded().await;
        let book = service
            .create_book(&json!({"title": "Harry Potter", "publication_year": 1997, "author": author.id}))
            .await
            .unwrap();
        service.delete_book(book.id).await.unwrap();
        let err = service.delete_book(book.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn library_detail_nests_books_and_librarian() {
        let (service, author) = seeded().await;
        let book = service
            .create_book(&json!({"title": "Harry Potter", "publication_year": 1997, "author": author.id}))
            .await
            .unwrap();
        let library = service
            .create_library(&json!({"name": "Central Library", "books": [book.id]}))
            .await
            .unwrap();
        assert!(library.librarian.is_none());

        service.assign_librarian(library.id, &json!({"name": "Ada"})).await.unwrap();
        let detail = service.library_detail(library.id).await.unwrap();
        assert_eq!(detail.books, vec![book]);
        assert_eq!(detail.librarian.map(|l| l.name).as_deref(), Some("Ada"));

        let err = service.assign_librarian(library.id, &json!({"name": "Grace"})).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn library_rejects_unknown_books() {
        let (service, _) = seeded().await;
        let err = service
            .create_library(&json!({"name": "Central Library", "books": [404]}))
            .await
            .unwrap_err();
        assert_eq!(err.to_json()["field_errors"]["books"], "Invalid pk \"404\" - object does not exist.");
        assert!(service.list_libraries(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn libraries_filter_by_exact_name() {
        let (service, _) = seeded().await;
        for name in ["Westside Branch", "Central Library"] {
            service.create_library(&json!({ "name": name })).await.unwrap();
        }
        let names: Vec<_> = service.list_libraries(None).await.unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Central Library", "Westside Branch"]);
        assert_eq!(service.list_libraries(Some("Central")).await.unwrap().len(), 0);
        assert_eq!(service.list_libraries(Some("Central Library")).await.unwrap().len(), 1);
    }
}
