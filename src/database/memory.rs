use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Author, Book, Librarian, Library, NewBook, NewUser, User};
use crate::database::store::CatalogStore;
use crate::filter::{BookRow, Filter};

#[derive(Default)]
struct MemoryState {
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, Book>,
    users: BTreeMap<i64, User>,
    libraries: BTreeMap<i64, Library>,
    holdings: BTreeMap<i64, BTreeSet<i64>>,
    librarians: BTreeMap<i64, Librarian>,
    next_author_id: i64,
    next_book_id: i64,
    next_user_id: i64,
    next_library_id: i64,
    next_librarian_id: i64,
}

impl MemoryState {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn author_name(&self, author_id: i64) -> &str {
        self.authors.get(&author_id).map(|a| a.name.as_str()).unwrap_or("")
    }

    fn require_author(&self, author_id: i64) -> Result<(), DatabaseError> {
        if self.authors.contains_key(&author_id) {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("author {}", author_id)))
        }
    }

    fn require_library(&self, library_id: i64) -> Result<(), DatabaseError> {
        if self.libraries.contains_key(&library_id) {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("library {}", library_id)))
        }
    }
}

/// Process-local store used when no database URL is configured and by tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_books(&self, filter: &Filter) -> Result<Vec<Book>, DatabaseError> {
        let state = self.state.read().await;
        let rows = state
            .books
            .values()
            .map(|book| BookRow {
                book,
                author_name: state.author_name(book.author_id),
            })
            .collect();
        Ok(filter.apply(rows).into_iter().map(|row| row.book.clone()).collect())
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, DatabaseError> {
        Ok(self.state.read().await.books.get(&id).cloned())
    }

    async fn create_book(&self, book: NewBook) -> Result<Book, DatabaseError> {
        let mut state = self.state.write().await;
        state.require_author(book.author_id)?;
        let id = MemoryState::next_id(&mut state.next_book_id);
        let book = Book::from_new(id, book);
        state.books.insert(id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: i64, book: NewBook) -> Result<Option<Book>, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.books.contains_key(&id) {
            return Ok(None);
        }
        state.require_author(book.author_id)?;
        let book = Book::from_new(id, book);
        state.books.insert(id, book.clone());
        Ok(Some(book))
    }

    async fn delete_book(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        if state.books.remove(&id).is_none() {
            return Ok(false);
        }
        for held in state.holdings.values_mut() {
            held.remove(&id);
        }
        Ok(true)
    }

    async fn count_books(&self) -> Result<i64, DatabaseError> {
        Ok(self.state.read().await.books.len() as i64)
    }

    async fn list_authors(&self) -> Result<Vec<Author>, DatabaseError> {
        let mut authors: Vec<Author> = self.state.read().await.authors.values().cloned().collect();
        authors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(authors)
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>, DatabaseError> {
        Ok(self.state.read().await.authors.get(&id).cloned())
    }

    async fn create_author(&self, name: String) -> Result<Author, DatabaseError> {
        let mut state = self.state.write().await;
        let id = MemoryState::next_id(&mut state.next_author_id);
        let author = Author { id, name };
        state.authors.insert(id, author.clone());
        Ok(author)
    }

    async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>, DatabaseError> {
        let mut books: Vec<Book> = self
            .state
            .read()
            .await
            .books
            .values()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn list_libraries(&self) -> Result<Vec<Library>, DatabaseError> {
        let mut libraries: Vec<Library> = self.state.read().await.libraries.values().cloned().collect();
        libraries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(libraries)
    }

    async fn get_library(&self, id: i64) -> Result<Option<Library>, DatabaseError> {
        Ok(self.state.read().await.libraries.get(&id).cloned())
    }

    async fn create_library(&self, name: String) -> Result<Library, DatabaseError> {
        let mut state = self.state.write().await;
        let id = MemoryState::next_id(&mut state.next_library_id);
        let library = Library { id, name };
        state.libraries.insert(id, library.clone());
        Ok(library)
    }

    async fn add_library_book(&self, library_id: i64, book_id: i64) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.require_library(library_id)?;
        if !state.books.contains_key(&book_id) {
            return Err(DatabaseError::NotFound(format!("book {}", book_id)));
        }
        state.holdings.entry(library_id).or_default().insert(book_id);
        Ok(())
    }

    async fn library_books(&self, library_id: i64) -> Result<Vec<Book>, DatabaseError> {
        let state = self.state.read().await;
        let mut books: Vec<Book> = state
            .holdings
            .get(&library_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.books.get(id).cloned())
            .collect();
        books.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn get_librarian(&self, library_id: i64) -> Result<Option<Librarian>, DatabaseError> {
        Ok(self.state.read().await.librarians.get(&library_id).cloned())
    }

    async fn create_librarian(&self, library_id: i64, name: String) -> Result<Librarian, DatabaseError> {
        let mut state = self.state.write().await;
        state.require_library(library_id)?;
        if state.librarians.contains_key(&library_id) {
            return Err(DatabaseError::Conflict(format!("library {} already has a librarian", library_id)));
        }
        let id = MemoryState::next_id(&mut state.next_librarian_id);
        let librarian = Librarian { id, name, library_id };
        state.librarians.insert(library_id, librarian.clone());
        Ok(librarian)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict(format!("username '{}' already exists", user.username)));
        }
        let id = MemoryState::next_id(&mut state.next_user_id);
        let user = User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            is_staff: user.is_staff,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.state.read().await.users.values().find(|u| u.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_book(title: &str, year: i32, author_id: i64) -> NewBook {
        NewBook { title: title.to_string(), publication_year: year, author_id }
    }

    #[tokio::test]
    async fn assigns_sequential_ids_and_counts() {
        let store = MemoryStore::new();
        let author = store.create_author("J.K. Rowling".to_string()).await.unwrap();
        let a = store.create_book(new_book("Harry Potter", 1997, author.id)).await.unwrap();
        let b = store.create_book(new_book("Fantastic Beasts", 2001, author.id)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.count_books().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn rejects_books_for_unknown_authors() {
        let store = MemoryStore::new();
        let err = store.create_book(new_book("Orphan", 2000, 42)).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        let store = MemoryStore::new();
        let author = store.create_author("J.R.R. Tolkien".to_string()).await.unwrap();
        assert!(store.update_book(9, new_book("X", 1, author.id)).await.unwrap().is_none());
        assert!(!store.delete_book(9).await.unwrap());

        let book = store.create_book(new_book("The Hobbit", 1937, author.id)).await.unwrap();
        let updated = store
            .update_book(book.id, new_book("The Hobbit, or There and Back Again", 1937, author.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, book.id);
        assert!(store.delete_book(book.id).await.unwrap());
        assert!(store.get_book(book.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_reaches_author_names() {
        let store = MemoryStore::new();
        let rowling = store.create_author("J.K. Rowling".to_string()).await.unwrap();
        let tolkien = store.create_author("J.R.R. Tolkien".to_string()).await.unwrap();
        store.create_book(new_book("Harry Potter", 1997, rowling.id)).await.unwrap();
        store.create_book(new_book("The Hobbit", 1937, tolkien.id)).await.unwrap();

        let found = store.list_books(&Filter::new().search("TOLKIEN")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "The Hobbit");
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = MemoryStore::new();
        let user = || NewUser { username: "testuser".to_string(), password_hash: "x".to_string(), is_staff: false };
        store.create_user(user()).await.unwrap();
        let err = store.create_user(user()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn library_holdings_follow_book_lifecycle() {
        let store = MemoryStore::new();
        let tolkien = store.create_author("J.R.R. Tolkien".to_string()).await.unwrap();
        let hobbit = store.create_book(new_book("The Hobbit", 1937, tolkien.id)).await.unwrap();
        let silmarillion = store.create_book(new_book("The Silmarillion", 1977, tolkien.id)).await.unwrap();
        let library = store.create_library("Central Library".to_string()).await.unwrap();

        store.add_library_book(library.id, silmarillion.id).await.unwrap();
        store.add_library_book(library.id, hobbit.id).await.unwrap();
        store.add_library_book(library.id, hobbit.id).await.unwrap();
        let titles: Vec<_> = store.library_books(library.id).await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["The Hobbit", "The Silmarillion"]);

        assert!(store.delete_book(hobbit.id).await.unwrap());
        assert_eq!(store.library_books(library.id).await.unwrap().len(), 1);

        let err = store.add_library_book(library.id, hobbit.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        let err = store.add_library_book(99, silmarillion.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn one_librarian_per_library() {
        let store = MemoryStore::new();
        let library = store.create_library("Central Library".to_string()).await.unwrap();
        assert!(store.get_librarian(library.id).await.unwrap().is_none());

        let librarian = store.create_librarian(library.id, "Ada".to_string()).await.unwrap();
        assert_eq!(store.get_librarian(library.id).await.unwrap(), Some(librarian));

        let err = store.create_librarian(library.id, "Grace".to_string()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        let err = store.create_librarian(42, "Grace".to_string()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
