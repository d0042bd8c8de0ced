//! Route configuration.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::{handlers, state::AppState};

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/blogs", get(handlers::list_blogs))
        .route("/api/blogs/", get(handlers::blog_without_slug))
        .route("/api/blogs/{slug}", get(handlers::blog_by_slug))
        .route("/api/__sitemap__/urls", get(handlers::sitemap_urls))
        .route("/sitemap.xml", get(handlers::sitemap_xml))
        .route("/robots.txt", get(handlers::robots_txt))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
