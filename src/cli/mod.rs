pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use client::ApiClient;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Bookshelf CLI - command-line client for the Bookshelf API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "BOOKSHELF_URL", default_value = "http://localhost:3000", help = "API base URL")]
    pub server: String,

    #[arg(long, global = true, env = "BOOKSHELF_TOKEN", hide_env_values = true, help = "Bearer token from `bookshelf login`")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server and store health")]
    Health,

    #[command(about = "Register a new account")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "BOOKSHELF_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Log in and print a bearer token")]
    Login {
        #[arg(help = "Username")]
        username: String,
        #[arg(long, env = "BOOKSHELF_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Show the account the current token belongs to")]
    Whoami,

    #[command(about = "Book operations")]
    Book {
        #[command(subcommand)]
        cmd: commands::book::BookCommands,
    },

    #[command(about = "Author operations")]
    Author {
        #[command(subcommand)]
        cmd: commands::author::AuthorCommands,
    },

    #[command(about = "Library operations")]
    Library {
        #[command(subcommand)]
        cmd: commands::library::LibraryCommands,
    },

    #[command(about = "Create authors and their books from a YAML or JSON fixture")]
    Import {
        #[arg(help = "Fixture file (.yaml, .yml or .json)")]
        file: std::path::PathBuf,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server, cli.token.clone())?;

    match cli.command {
        Commands::Health => commands::health::handle(&client, output_format).await,
        Commands::Register { username, password } => {
            commands::auth::register(&client, &username, &password, output_format).await
        }
        Commands::Login { username, password } => {
            commands::auth::login(&client, &username, &password, output_format).await
        }
        Commands::Whoami => commands::auth::whoami(&client, output_format).await,
        Commands::Book { cmd } => commands::book::handle(&client, cmd, output_format).await,
        Commands::Author { cmd } => commands::author::handle(&client, cmd, output_format).await,
        Commands::Library { cmd } => commands::library::handle(&client, cmd, output_format).await,
        Commands::Import { file } => commands::import::handle(&client, &file, output_format).await,
    }
}
