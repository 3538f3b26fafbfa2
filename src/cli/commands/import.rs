use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::Deserialize;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::{ApiClient, OutputFormat};

/// Fixture layout: authors, each with the books to create under them.
///
/// ```yaml
/// authors:
///   - name: J.R.R. Tolkien
///     books:
///       - title: The Hobbit
///         publication_year: 1937
/// ```
#[derive(Debug, Deserialize, PartialEq)]
pub struct Fixture {
    pub authors: Vec<FixtureAuthor>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct FixtureAuthor {
    pub name: String,
    #[serde(default)]
    pub books: Vec<FixtureBook>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct FixtureBook {
    pub title: String,
    pub publication_year: i32,
}

pub fn parse_fixture(path: &Path, content: &str) -> anyhow::Result<Fixture> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(content).context("invalid YAML fixture"),
        "json" => serde_json::from_str(content).context("invalid JSON fixture"),
        other => Err(anyhow!("unsupported fixture type '{}'; use .yaml, .yml or .json", other)),
    }
}

pub async fn handle(client: &ApiClient, file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let content = fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let fixture = parse_fixture(file, &content)?;

    // Reuse authors that already exist by exact name
    let existing = client.get("/api/authors", &[]).await?;
    let mut author_ids: HashMap<String, i64> = existing
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|a| Some((a["name"].as_str()?.to_string(), a["id"].as_i64()?)))
        .collect();

    let mut created_authors = 0;
    let mut created_books = 0;
    for author in fixture.authors {
        let author_id = match author_ids.get(&author.name) {
            Some(id) => *id,
            None => {
                let created = client.post("/api/authors", &json!({ "name": author.name })).await?;
                let id = created["id"]
                    .as_i64()
                    .ok_or_else(|| anyhow!("server returned an author without an id"))?;
                author_ids.insert(author.name.clone(), id);
                created_authors += 1;
                id
            }
        };

        for book in author.books {
            client
                .post(
                    "/api/books",
                    &json!({ "title": book.title, "publication_year": book.publication_year, "author": author_id }),
                )
                .await
                .with_context(|| format!("failed to create '{}'", book.title))?;
            created_books += 1;
        }
    }

    output_success(
        output_format,
        &format!("Imported {} authors and {} books from {}", created_authors, created_books, file.display()),
        Some(json!({ "authors": created_authors, "books": created_books })),
    )
}
