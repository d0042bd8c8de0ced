//! Headless CMS access.
//!
//! This module defines the [`BlogSource`] seam the endpoints are written
//! against, the query shape sent to the CMS, and the errors a fetch can
//! produce. [`CmsClient`] is the HTTP implementation.

mod client;
mod model;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use client::CmsClient;
pub(crate) use model::first_present;
pub use model::{CmsAuthor, CmsBlog, CmsCollection, CmsImage, ContentBlock, RICH_TEXT_COMPONENT};

/// Sort order used for listings and the sitemap.
pub const SORT_NEWEST_FIRST: &str = "publishedDate:desc";

/// Errors that can occur while talking to the CMS.
#[derive(Debug, Error)]
pub enum CmsError {
    /// The request could not be sent or the response body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        /// URL that was requested.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The CMS answered with a non-success status.
    #[error("CMS responded with HTTP {status}: {message}")]
    Status {
        /// HTTP status code returned by the CMS.
        status: u16,
        /// Error message extracted from the response.
        message: String,
    },

    /// The response body was not a valid collection.
    #[error("failed to decode CMS response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl CmsError {
    /// Create a status error.
    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// The HTTP status the CMS answered with, when there was one.
    #[must_use]
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::Client(_) => None,
        }
    }

    /// Check if the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request { source, .. } if source.is_timeout())
    }
}

/// Query parameters for the blog collection endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogQuery {
    /// Only return blogs with exactly this slug.
    pub slug: Option<String>,
    /// Populate all relations (`populate=*`).
    pub populate: bool,
    /// Sort expression, e.g. `publishedDate:desc`.
    pub sort: Option<String>,
}

impl BlogQuery {
    /// Query used by the listing endpoint.
    #[must_use]
    pub fn listing() -> Self {
        Self {
            slug: None,
            populate: true,
            sort: Some(SORT_NEWEST_FIRST.to_string()),
        }
    }

    /// Query used to look up a single blog.
    #[must_use]
    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            populate: true,
            sort: None,
        }
    }

    /// Query used by the sitemap source. Relations are not needed there.
    #[must_use]
    pub fn sitemap() -> Self {
        Self {
            slug: None,
            populate: false,
            sort: Some(SORT_NEWEST_FIRST.to_string()),
        }
    }

    /// Render the query as CMS query-string pairs.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(slug) = &self.slug {
            params.push(("filters[slug][$eq]", slug.clone()));
        }
        if self.populate {
            params.push(("populate", "*".to_string()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort", sort.clone()));
        }
        params
    }
}

/// Something that can answer blog collection queries.
///
/// The endpoints only depend on this trait, so tests can substitute an
/// in-memory source for the HTTP client.
#[async_trait::async_trait]
pub trait BlogSource: Send + Sync + std::fmt::Debug {
    /// Fetch the blogs matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS is unreachable, answers with an error
    /// status, or returns a body that is not a blog collection.
    async fn fetch_blogs(&self, query: &BlogQuery) -> Result<Vec<CmsBlog>, CmsError>;
}
