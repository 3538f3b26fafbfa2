use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service name, version and route overview
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Bookshelf API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Book catalog with public reads, authenticated writes and staff-only deletes",
        "endpoints": {
            "auth": ["/auth/register", "/auth/login", "/api/auth/whoami"],
            "books": ["/api/books", "/api/books/:id"],
            "authors": ["/api/authors", "/api/authors/:id"],
            "libraries": [
                "/api/libraries",
                "/api/libraries/:id",
                "/api/libraries/:id/books",
                "/api/libraries/:id/librarian",
            ],
            "health": "/health",
        },
        "query": {
            "filters": ["title", "author", "author_name", "publication_year"],
            "search": "title, author name",
            "ordering": ["title", "publication_year"],
        }
    }))
}
