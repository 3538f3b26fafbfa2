use serde_json::json;

use crate::cli::utils::{output_record, output_success, render_user};
use crate::cli::{ApiClient, OutputFormat};

pub async fn register(client: &ApiClient, username: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = client
        .post("/auth/register", &json!({ "username": username, "password": password }))
        .await?;
    output_success(output_format, &format!("Registered {}", render_user(&user)), Some(json!({ "user": user })))
}

pub async fn login(client: &ApiClient, username: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let response = client
        .post("/auth/login", &json!({ "username": username, "password": password }))
        .await?;

    match output_format {
        OutputFormat::Json => output_record(output_format, &response, |_| String::new()),
        OutputFormat::Text => {
            println!("✓ Logged in as {}", render_user(&response["user"]));
            println!("export BOOKSHELF_TOKEN={}", response["token"].as_str().unwrap_or_default());
            Ok(())
        }
    }
}

pub async fn whoami(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    if !client.has_token() {
        anyhow::bail!("no token set; pass --token or export BOOKSHELF_TOKEN");
    }
    let user = client.get("/api/auth/whoami", &[]).await?;
    output_record(output_format, &user, render_user)
}
