use anyhow::Context;
use tracing_subscriber::EnvFilter;

use bookshelf_api::config;
use bookshelf_api::database::DatabaseManager;
use bookshelf_api::{is_development, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, SECURITY_JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bookshelf_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Bookshelf API in {:?} mode", config.environment);
    if is_development!() {
        tracing::warn!("Development profile: permissive CORS and a built-in JWT secret are in use");
    }
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("SECURITY_JWT_SECRET is not set; logins will fail until it is configured");
    }

    let store = DatabaseManager::connect(config).await.context("failed to open record store")?;
    let state = AppState::new(store.clone(), config.clone());

    if let Some(admin) = state.users().ensure_admin(&config.security).await? {
        tracing::info!("Created staff account '{}'", admin.username);
    }

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Bookshelf API listening on http://{} ({} store)", bind_addr, store.backend());

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
