use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::cli::utils::{output_collection, output_record, output_success, render_book};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum BookCommands {
    #[command(about = "List books with optional filters")]
    List {
        #[arg(long, help = "Exact title")]
        title: Option<String>,
        #[arg(long, help = "Author id")]
        author: Option<i64>,
        #[arg(long, help = "Exact author name")]
        author_name: Option<String>,
        #[arg(long, help = "Publication year")]
        year: Option<i32>,
        #[arg(long, help = "Search title and author name")]
        search: Option<String>,
        #[arg(long, help = "Ordering, e.g. '-publication_year,title'")]
        ordering: Option<String>,
    },

    #[command(about = "Show one book")]
    Get {
        #[arg(help = "Book id")]
        id: i64,
    },

    #[command(about = "Create a book")]
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, help = "Publication year")]
        year: i32,
        #[arg(long, help = "Author id")]
        author: i64,
    },

    #[command(about = "Update a book; all three fields replace it, fewer patch it")]
    Update {
        #[arg(help = "Book id")]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, help = "Publication year")]
        year: Option<i32>,
        #[arg(long, help = "Author id")]
        author: Option<i64>,
    },

    #[command(about = "Delete a book (staff only)")]
    Delete {
        #[arg(help = "Book id")]
        id: i64,
    },
}

pub async fn handle(client: &ApiClient, cmd: BookCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        BookCommands::List { title, author, author_name, year, search, ordering } => {
            let query = list_query(title, author, author_name, year, search, ordering);
            let books = client.get("/api/books", &query).await?;
            output_collection(output_format, &books, "No books found", render_book)
        }
        BookCommands::Get { id } => {
            let book = client.get(&format!("/api/books/{}", id), &[]).await?;
            output_record(output_format, &book, render_book)
        }
        BookCommands::Create { title, year, author } => {
            let book = client
                .post("/api/books", &json!({ "title": title, "publication_year": year, "author": author }))
                .await?;
            output_record(output_format, &book, render_book)
        }
        BookCommands::Update { id, title, year, author } => {
            let path = format!("/api/books/{}", id);
            let (body, complete) = update_body(title, year, author);
            if body.as_object().map_or(true, Map::is_empty) {
                anyhow::bail!("nothing to update; pass --title, --year or --author");
            }
            let book = if complete { client.put(&path, &body).await? } else { client.patch(&path, &body).await? };
            output_record(output_format, &book, render_book)
        }
        BookCommands::Delete { id } => {
            client.delete(&format!("/api/books/{}", id)).await?;
            output_success(output_format, &format!("Deleted book {}", id), Some(json!({ "id": id })))
        }
    }
}

fn list_query(
    title: Option<String>,
    author: Option<i64>,
    author_name: Option<String>,
    year: Option<i32>,
    search: Option<String>,
    ordering: Option<String>,
) -> Vec<(&'static str, String)> {
    [
        ("title", title),
        ("author", author.map(|a| a.to_string())),
        ("author_name", author_name),
        ("publication_year", year.map(|y| y.to_string())),
        ("search", search),
        ("ordering", ordering),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key, v)))
    .collect()
}

/// Build the update body; the flag is true when every field is present.
fn update_body(title: Option<String>, year: Option<i32>, author: Option<i64>) -> (Value, bool) {
    let complete = title.is_some() && year.is_some() && author.is_some();
    let mut body = Map::new();
    if let Some(title) = title {
        body.insert("title".into(), json!(title));
    }
    if let Some(year) = year {
        body.insert("publication_year".into(), json!(year));
    }
    if let Some(author) = author {
        body.insert("author".into(), json!(author));
    }
    (Value::Object(body), complete)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_skips_unset_filters() {
        let query = list_query(None, Some(2), None, None, Some("hobbit".into()), None);
        assert_eq!(query, vec![("author", "2".to_string()), ("search", "hobbit".to_string())]);
    }

    #[test]
    fn partial_update_uses_patch() {
        let (body, complete) = update_body(None, Some(1998), None);
        assert_eq!(body, json!({ "publication_year": 1998 }));
        assert!(!complete);

        let (_, complete) = update_body(Some("Dune".into()), Some(1965), Some(4));
        assert!(complete);
    }
}
