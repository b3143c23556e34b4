//! nclex-server library - review board REST API
//!
//! Serves exam-preparation reviews, comments and aggregate statistics from a
//! SQLite database under the `/api` prefix.

use axum::http::HeaderValue;
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod api;
pub mod db;
pub mod pagination;

/// List paging limits
#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub default_per_page: i64,
    pub max_per_page: i64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            default_per_page: 12,
            max_per_page: 50,
        }
    }
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub paging: Paging,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, paging: Paging) -> Self {
        Self { db, paging }
    }
}

/// Build application router
///
/// `cors_origins` lists the browser origins allowed to call the API; an empty
/// list allows any origin.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/stats", get(api::get_stats))
        .route("/reviews", get(api::list_reviews).post(api::create_review))
        .route("/reviews/:id", get(api::get_review))
        .route("/reviews/:id/like", post(api::like_review))
        .route(
            "/reviews/:id/comments",
            get(api::list_comments).post(api::create_comment),
        );

    Router::new()
        .nest("/api", api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for the configured origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
