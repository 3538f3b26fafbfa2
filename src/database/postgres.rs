use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::{Author, Book, Librarian, Library, NewBook, NewUser, User};
use crate::database::query_builder::QueryBuilder;
use crate::database::store::CatalogStore;
use crate::filter::Filter;

/// Idempotent table bootstrap, executed statement by statement on connect.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS authors (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS books (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(200) NOT NULL,
        publication_year INTEGER NOT NULL,
        author_id BIGINT NOT NULL REFERENCES authors(id) ON DELETE CASCADE
    )"#,
    "CREATE INDEX IF NOT EXISTS books_author_id_idx ON books (author_id)",
    r#"CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(150) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        is_staff BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS libraries (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS library_books (
        library_id BIGINT NOT NULL REFERENCES libraries(id) ON DELETE CASCADE,
        book_id BIGINT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
        PRIMARY KEY (library_id, book_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS librarians (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        library_id BIGINT NOT NULL UNIQUE REFERENCES libraries(id) ON DELETE CASCADE
    )"#,
];

const BOOK_COLUMNS: &str = "id, title, publication_year, author_id";
const USER_COLUMNS: &str = "id, username, password_hash, is_staff, created_at";
const LIBRARIAN_COLUMNS: &str = "id, name, library_id";

pub struct PgStore {
    pool: PgPool,
    log_queries: bool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        let store = Self {
            pool,
            log_queries: config.enable_query_logging,
        };
        store.ensure_schema().await?;
        info!("Connected PostgreSQL catalog store");
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn trace(&self, sql: &str) {
        if self.log_queries {
            debug!(sql, "executing query");
        }
    }
}

fn map_write_error(err: sqlx::Error) -> DatabaseError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return DatabaseError::Conflict(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return DatabaseError::NotFound(db_err.message().to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

#[async_trait]
impl CatalogStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed PostgreSQL pool");
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_books(&self, filter: &Filter) -> Result<Vec<Book>, DatabaseError> {
        if self.log_queries {
            debug!(sql = %filter.to_sql().query, "executing list query");
        }
        QueryBuilder::<Book>::new(filter.clone()).select_all(&self.pool).await
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, DatabaseError> {
        let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        self.trace(&sql);
        let book = sqlx::query_as::<_, Book>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(book)
    }

    async fn create_book(&self, book: NewBook) -> Result<Book, DatabaseError> {
        let sql = format!(
            "INSERT INTO books (title, publication_year, author_id) VALUES ($1, $2, $3) RETURNING {}",
            BOOK_COLUMNS
        );
        self.trace(&sql);
        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(book.publication_year)
            .bind(book.author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_book(&self, id: i64, book: NewBook) -> Result<Option<Book>, DatabaseError> {
        let sql = format!(
            "UPDATE books SET title = $1, publication_year = $2, author_id = $3 WHERE id = $4 RETURNING {}",
            BOOK_COLUMNS
        );
        self.trace(&sql);
        sqlx::query_as::<_, Book>(&sql)
            .bind(&book.title)
            .bind(book.publication_year)
            .bind(book.author_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn delete_book(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1").bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_books(&self) -> Result<i64, DatabaseError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM books").fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn list_authors(&self) -> Result<Vec<Author>, DatabaseError> {
        let authors = sqlx::query_as::<_, Author>("SELECT id, name FROM authors ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(authors)
    }

    async fn get_author(&self, id: i64) -> Result<Option<Author>, DatabaseError> {
        let author = sqlx::query_as::<_, Author>("SELECT id, name FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(author)
    }

    async fn create_author(&self, name: String) -> Result<Author, DatabaseError> {
        sqlx::query_as::<_, Author>("INSERT INTO authors (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY title ASC, id ASC",
            BOOK_COLUMNS
        );
        let books = sqlx::query_as::<_, Book>(&sql).bind(author_id).fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn list_libraries(&self) -> Result<Vec<Library>, DatabaseError> {
        let libraries = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries ORDER BY name ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(libraries)
    }

    async fn get_library(&self, id: i64) -> Result<Option<Library>, DatabaseError> {
        let library = sqlx::query_as::<_, Library>("SELECT id, name FROM libraries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(library)
    }

    async fn create_library(&self, name: String) -> Result<Library, DatabaseError> {
        sqlx::query_as::<_, Library>("INSERT INTO libraries (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn add_library_book(&self, library_id: i64, book_id: i64) -> Result<(), DatabaseError> {
        let sql = "INSERT INTO library_books (library_id, book_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";
        self.trace(sql);
        sqlx::query(sql)
            .bind(library_id)
            .bind(book_id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn library_books(&self, library_id: i64) -> Result<Vec<Book>, DatabaseError> {
        let sql = "SELECT b.id, b.title, b.publication_year, b.author_id FROM books b \
                   JOIN library_books lb ON lb.book_id = b.id \
                   WHERE lb.library_id = $1 ORDER BY b.title ASC, b.id ASC";
        self.trace(sql);
        let books = sqlx::query_as::<_, Book>(sql).bind(library_id).fetch_all(&self.pool).await?;
        Ok(books)
    }

    async fn get_librarian(&self, library_id: i64) -> Result<Option<Librarian>, DatabaseError> {
        let sql = format!("SELECT {} FROM librarians WHERE library_id = $1", LIBRARIAN_COLUMNS);
        let librarian = sqlx::query_as::<_, Librarian>(&sql)
            .bind(library_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(librarian)
    }

    async fn create_librarian(&self, library_id: i64, name: String) -> Result<Librarian, DatabaseError> {
        let sql = format!(
            "INSERT INTO librarians (name, library_id) VALUES ($1, $2) RETURNING {}",
            LIBRARIAN_COLUMNS
        );
        self.trace(&sql);
        sqlx::query_as::<_, Librarian>(&sql)
            .bind(name)
            .bind(library_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, password_hash, is_staff) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql).bind(username).fetch_optional(&self.pool).await?;
        Ok(user)
    }
}
