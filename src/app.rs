use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::database::CatalogStore;
use crate::handlers::{elevated, protected, public};
use crate::middleware::authenticate_middleware;
use crate::services::{CatalogService, UserService};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn catalog(&self) -> CatalogService {
        CatalogService::new(self.store.clone())
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.store.clone())
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        // Service
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_routes())
        .merge(book_routes())
        .merge(author_routes())
        .merge(library_routes())
        .layer(middleware::from_fn_with_state(state.clone(), authenticate_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if let Some(cors) = cors_layer(&config) {
        app = app.layer(cors);
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        .route("/api/auth/whoami", get(protected::auth::whoami))
}

// Each path is registered once; the extractors in each handler enforce its access tier.
fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/api/books", get(public::books::list).post(protected::books::create))
        .route(
            "/api/books/:id",
            get(public::books::detail)
                .put(protected::books::replace)
                .patch(protected::books::patch)
                .delete(elevated::books::delete),
        )
}

fn author_routes() -> Router<AppState> {
    Router::new()
        .route("/api/authors", get(public::authors::list).post(protected::authors::create))
        .route("/api/authors/:id", get(public::authors::detail))
}

fn library_routes() -> Router<AppState> {
    Router::new()
        .route("/api/libraries", get(public::libraries::list).post(protected::libraries::create))
        .route("/api/libraries/:id", get(public::libraries::detail))
        .route("/api/libraries/:id/books", post(protected::libraries::add_book))
        .route("/api/libraries/:id/librarian", post(protected::libraries::assign))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if matches!(config.environment, Environment::Development) {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
            .allow_headers(Any),
    )
}
