#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use bookshelf_api::auth::{self, Claims};
use bookshelf_api::config::AppConfig;
use bookshelf_api::database::models::{NewBook, NewUser, User};
use bookshelf_api::database::{CatalogStore, MemoryStore};
use bookshelf_api::{router, AppState};

pub const USER_PASSWORD: &str = "password123";
pub const ADMIN_PASSWORD: &str = "admin123";

// Argon2 is slow in debug builds; hash each seed password once per test binary
static HASHES: OnceLock<(String, String)> = OnceLock::new();

fn seed_hashes() -> Result<&'static (String, String)> {
    if let Some(hashes) = HASHES.get() {
        return Ok(hashes);
    }
    let user = auth::hash_password(USER_PASSWORD)?;
    let admin = auth::hash_password(ADMIN_PASSWORD)?;
    Ok(HASHES.get_or_init(|| (user, admin)))
}

/// An in-process server over a seeded in-memory store.
///
/// Seed: authors J.K. Rowling and J.R.R. Tolkien, books Harry Potter (1997)
/// and The Hobbit (1937), users `testuser` and staff `admin`.
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub config: AppConfig,
    pub store: Arc<dyn CatalogStore>,
    pub rowling_id: i64,
    pub tolkien_id: i64,
    pub harry_potter_id: i64,
    pub hobbit_id: i64,
    pub user: User,
    pub admin: User,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with the development config adjusted by `configure`.
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        configure(&mut config);

        let store: Arc<dyn CatalogStore> = Arc::new(MemoryStore::new());
        let rowling = store.create_author("J.K. Rowling".into()).await?;
        let tolkien = store.create_author("J.R.R. Tolkien".into()).await?;
        let harry_potter = store
            .create_book(NewBook { title: "Harry Potter".into(), publication_year: 1997, author_id: rowling.id })
            .await?;
        let hobbit = store
            .create_book(NewBook { title: "The Hobbit".into(), publication_year: 1937, author_id: tolkien.id })
            .await?;

        let (user_hash, admin_hash) = seed_hashes()?;
        let user = store
            .create_user(NewUser { username: "testuser".into(), password_hash: user_hash.clone(), is_staff: false })
            .await?;
        let admin = store
            .create_user(NewUser { username: "admin".into(), password_hash: admin_hash.clone(), is_staff: true })
            .await?;

        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;

        let app = router(AppState::new(store.clone(), config.clone()));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            base_url,
            client: reqwest::Client::new(),
            config,
            store,
            rowling_id: rowling.id,
            tolkien_id: tolkien.id,
            harry_potter_id: harry_potter.id,
            hobbit_id: hobbit.id,
            user,
            admin,
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Mint a token directly, skipping the password check.
    pub fn token_for(&self, user: &User) -> Result<String> {
        let claims = Claims::new(user, self.config.security.jwt_expiry_hours);
        Ok(auth::generate_jwt(&claims, &self.config.security)?)
    }

    pub fn user_token(&self) -> Result<String> {
        self.token_for(&self.user)
    }

    pub fn admin_token(&self) -> Result<String> {
        self.token_for(&self.admin)
    }

    pub async fn book_count(&self) -> Result<i64> {
        Ok(self.store.count_books().await?)
    }
}

/// Titles of a book list response, in order.
pub fn titles(books: &serde_json::Value) -> Vec<String> {
    books
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|b| b["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
