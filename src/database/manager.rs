use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::CatalogStore;

/// Errors from the catalog store backends
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Chooses and opens the record store described by configuration
pub struct DatabaseManager;

impl DatabaseManager {
    /// PostgreSQL when `database.url` is set, otherwise the in-memory store.
    pub async fn connect(config: &AppConfig) -> Result<Arc<dyn CatalogStore>, DatabaseError> {
        match config.database.url.as_deref() {
            Some(url) => {
                let url = Self::validate_url(url)?;
                let store = PgStore::connect(&url, &config.database).await?;
                Ok(Arc::new(store))
            }
            None => {
                warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    fn validate_url(raw: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(raw).map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;
        match url.scheme() {
            "postgres" | "postgresql" => {}
            other => {
                return Err(DatabaseError::InvalidDatabaseUrl(format!("unsupported scheme '{}'", other)));
            }
        }
        if url.path().trim_start_matches('/').is_empty() {
            return Err(DatabaseError::InvalidDatabaseUrl("missing database name".to_string()));
        }
        info!("Using PostgreSQL database '{}' on {}", url.path().trim_start_matches('/'), url.host_str().unwrap_or("localhost"));
        Ok(url.into())
    }
}
