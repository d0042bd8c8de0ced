//! Request handlers.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use super::{state::AppState, ApiError};
use crate::blog::{self, TransformedBlog};
use crate::error::Error;
use crate::sitemap::{self, SitemapUrl};

/// `{ "data": [...] }` envelope for blog responses.
#[derive(Debug, Serialize)]
pub struct BlogResponse {
    /// Blogs, newest first.
    pub data: Vec<TransformedBlog>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Package name.
    pub service: &'static str,
    /// Package version.
    pub version: &'static str,
}

/// `GET /api/blogs`
pub async fn list_blogs(State(state): State<AppState>) -> Json<BlogResponse> {
    Json(BlogResponse {
        data: blog::list_blogs(state.source()).await,
    })
}

/// `GET /api/blogs/{slug}`
pub async fn blog_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let data = blog::find_blog(state.source(), &slug).await?;
    debug!(slug, count = data.len(), "blog found");
    Ok(Json(BlogResponse { data }))
}

/// `GET /api/blogs/` with an empty slug segment.
pub async fn blog_without_slug() -> ApiError {
    Error::missing_input("slug").into()
}

/// `GET /api/__sitemap__/urls`
pub async fn sitemap_urls(State(state): State<AppState>) -> Json<Vec<SitemapUrl>> {
    Json(sitemap::sitemap_urls(state.source(), Utc::now()).await)
}

/// `GET /sitemap.xml`
pub async fn sitemap_xml(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let config = state.config();
    if !config.sitemap.enabled {
        return Err(ApiError::NotFound("Sitemap not found".to_string()));
    }

    let urls = sitemap::sitemap_urls(state.source(), Utc::now()).await;
    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap::render_xml(&urls, &config.site.url),
    ))
}

/// `GET /robots.txt`
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        sitemap::render_robots(state.config()),
    )
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
