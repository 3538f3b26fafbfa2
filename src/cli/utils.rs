use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "success": true, "message": message });
            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a single API record; text mode renders it with `render`
pub fn output_record(output_format: OutputFormat, record: &Value, render: fn(&Value) -> String) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Text => println!("{}", render(record)),
    }
    Ok(())
}

/// Output a list of API records, or `empty_message` when there are none
pub fn output_collection(
    output_format: OutputFormat,
    records: &Value,
    empty_message: &str,
    render: fn(&Value) -> String,
) -> anyhow::Result<()> {
    let items = records.as_array().map(Vec::as_slice).unwrap_or_default();
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Text if items.is_empty() => println!("{}", empty_message),
        OutputFormat::Text => {
            for item in items {
                println!("{}", render(item));
            }
        }
    }
    Ok(())
}

pub fn render_book(book: &Value) -> String {
    format!(
        "{:>5}  {} ({}) [author {}]",
        book["id"].to_string(),
        book["title"].as_str().unwrap_or_default(),
        book["publication_year"],
        book["author"]
    )
}

pub fn render_author(author: &Value) -> String {
    let mut line = format!("{:>5}  {}", author["id"].to_string(), author["name"].as_str().unwrap_or_default());
    if let Some(books) = author.get("books").and_then(Value::as_array) {
        for book in books {
            line.push('\n');
            line.push_str(&format!("       - {}", render_book(book).trim_start()));
        }
    }
    line
}

pub fn render_library(library: &Value) -> String {
    let mut line = format!("{:>5}  {}", library["id"].to_string(), library["name"].as_str().unwrap_or_default());
    if let Some(librarian) = library.get("librarian").filter(|l| !l.is_null()) {
        line.push_str(&format!(" (librarian: {})", librarian["name"].as_str().unwrap_or_default()));
    }
    if let Some(books) = library.get("books").and_then(Value::as_array) {
        for book in books {
            line.push('\n');
            line.push_str(&format!("       - {}", render_book(book).trim_start()));
        }
    }
    line
}

pub fn render_user(user: &Value) -> String {
    let role = if user["is_staff"].as_bool().unwrap_or(false) { "staff" } else { "user" };
    format!("{} (id {}, {})", user["username"].as_str().unwrap_or_default(), user["id"], role)
}
