use crate::cli::{utils::output_record, ApiClient, OutputFormat};

pub async fn handle(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let health = client.get("/health", &[]).await?;
    output_record(output_format, &health, |h| {
        format!(
            "Status: {} (store: {}, backend: {})",
            h["status"].as_str().unwrap_or("unknown"),
            h["store"].as_str().unwrap_or("unknown"),
            h["backend"].as_str().unwrap_or("unknown")
        )
    })
}
