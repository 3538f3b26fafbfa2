use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_collection, output_record, output_success, render_library};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum LibraryCommands {
    #[command(about = "List libraries")]
    List {
        #[arg(long, help = "Exact library name")]
        name: Option<String>,
    },

    #[command(about = "Show a library with its books and librarian")]
    Get {
        #[arg(help = "Library id")]
        id: i64,
    },

    #[command(about = "Create a library")]
    Create {
        #[arg(help = "Library name")]
        name: String,
        #[arg(long = "book", help = "Book id to hold; repeatable")]
        books: Vec<i64>,
    },

    #[command(about = "Add a book to a library")]
    AddBook {
        #[arg(help = "Library id")]
        id: i64,
        #[arg(help = "Book id")]
        book: i64,
    },

    #[command(about = "Assign the librarian of a library")]
    Librarian {
        #[arg(help = "Library id")]
        id: i64,
        #[arg(help = "Librarian name")]
        name: String,
    },
}

pub async fn handle(client: &ApiClient, cmd: LibraryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        LibraryCommands::List { name } => {
            let query: Vec<(&str, String)> = name.into_iter().map(|n| ("name", n)).collect();
            let libraries = client.get("/api/libraries", &query).await?;
            output_collection(output_format, &libraries, "No libraries found", render_library)
        }
        LibraryCommands::Get { id } => {
            let library = client.get(&format!("/api/libraries/{}", id), &[]).await?;
            output_record(output_format, &library, render_library)
        }
        LibraryCommands::Create { name, books } => {
            let library = client.post("/api/libraries", &json!({ "name": name, "books": books })).await?;
            output_record(output_format, &library, render_library)
        }
        LibraryCommands::AddBook { id, book } => {
            let library = client
                .post(&format!("/api/libraries/{}/books", id), &json!({ "book": book }))
                .await?;
            output_record(output_format, &library, render_library)
        }
        LibraryCommands::Librarian { id, name } => {
            let librarian = client
                .post(&format!("/api/libraries/{}/librarian", id), &json!({ "name": name }))
                .await?;
            let message = format!(
                "Assigned librarian {} to library {}",
                librarian["name"].as_str().unwrap_or_default(),
                id
            );
            output_success(output_format, &message, Some(json!({ "librarian": librarian })))
        }
    }
}
