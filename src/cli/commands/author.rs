use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_collection, output_record, render_author};
use crate::cli::{ApiClient, OutputFormat};

#[derive(Subcommand)]
pub enum AuthorCommands {
    #[command(about = "List authors")]
    List,

    #[command(about = "Show an author and their books")]
    Get {
        #[arg(help = "Author id")]
        id: i64,
    },

    #[command(about = "Create an author")]
    Create {
        #[arg(help = "Author name")]
        name: String,
    },
}

pub async fn handle(client: &ApiClient, cmd: AuthorCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthorCommands::List => {
            let authors = client.get("/api/authors", &[]).await?;
            output_collection(output_format, &authors, "No authors found", render_author)
        }
        AuthorCommands::Get { id } => {
            let author = client.get(&format!("/api/authors/{}", id), &[]).await?;
            output_record(output_format, &author, render_author)
        }
        AuthorCommands::Create { name } => {
            let author = client.post("/api/authors", &json!({ "name": name })).await?;
            output_record(output_format, &author, render_author)
        }
    }
}
