//! HTTP client for the CMS blog collection.

use tracing::{debug, trace};

use super::{BlogQuery, BlogSource, CmsBlog, CmsCollection, CmsError};
use crate::config::CmsConfig;

const USER_AGENT: &str = concat!("anhourtec-site/", env!("CARGO_PKG_VERSION"));

/// Fetches blogs from the CMS over HTTP.
///
/// Each call issues exactly one request; failures are returned to the caller
/// and never retried here.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    blogs_url: String,
}

impl CmsClient {
    /// Build a client for the configured CMS.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &CmsConfig) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CmsError::Client(e.to_string()))?;

        Ok(Self::with_http_client(http, config))
    }

    /// Build a client on top of an existing HTTP client.
    ///
    /// The configured timeout is not applied; `http` keeps its own settings.
    #[must_use]
    pub fn with_http_client(http: reqwest::Client, config: &CmsConfig) -> Self {
        Self {
            http,
            blogs_url: collection_url(&config.base_url, &config.blogs_path),
        }
    }

    /// Absolute URL of the blog collection.
    #[must_use]
    pub fn blogs_url(&self) -> &str {
        &self.blogs_url
    }
}

#[async_trait::async_trait]
impl BlogSource for CmsClient {
    async fn fetch_blogs(&self, query: &BlogQuery) -> Result<Vec<CmsBlog>, CmsError> {
        let params = query.to_params();
        debug!(url = %self.blogs_url, ?params, "fetching blogs from CMS");

        let response = self
            .http
            .get(&self.blogs_url)
            .query(&params)
            .send()
            .await
            .map_err(|source| CmsError::Request {
                url: self.blogs_url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| CmsError::Request {
            url: self.blogs_url.clone(),
            source,
        })?;

        if !status.is_success() {
            let message = error_message(&body)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(CmsError::status(status.as_u16(), message));
        }

        let collection: CmsCollection<CmsBlog> = serde_json::from_slice(&body)?;
        trace!(count = collection.data.len(), "CMS returned blogs");
        Ok(collection.data)
    }
}

/// Join the base URL and collection path without doubling slashes.
fn collection_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull `error.message` out of a CMS error body, if it has one.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(serde_json::Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
