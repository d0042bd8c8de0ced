//! Blog view models and the operations behind the blog endpoints.
//!
//! [`TransformedBlog::from_cms`] is total: every field has a fallback, so a
//! sparse CMS record still produces a usable view model.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::cms::{BlogQuery, BlogSource, CmsBlog};
use crate::error::{Error, Result};

/// Route prefix for blog pages.
pub const BLOG_ROUTE_PREFIX: &str = "/blog/";

/// A blog as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformedBlog {
    /// CMS record id.
    pub id: u64,
    /// Site route, `/blog/{slug}`.
    pub path: String,
    /// Headline.
    pub title: String,
    /// Teaser.
    pub description: String,
    /// URL slug.
    pub slug: String,
    /// Pinned on the listing.
    pub featured: bool,
    /// Cover image, if the record has one.
    pub image: Option<BlogImage>,
    /// Author, if the record has one.
    pub author: Option<BlogAuthor>,
    /// Publication time, normalized to UTC RFC 3339 when parseable.
    pub published_at: String,
    /// Rich-text body.
    pub body: String,
}

/// Flattened cover image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogImage {
    /// Image URL.
    pub src: String,
    /// Alt text.
    pub alt: String,
}

/// Flattened author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogAuthor {
    /// Display name.
    pub name: String,
    /// Social handle, omitted when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<String>,
}

impl TransformedBlog {
    /// Build the view model for a CMS record.
    #[must_use]
    pub fn from_cms(blog: &CmsBlog) -> Self {
        let title = blog.title.clone().unwrap_or_default();
        let slug = blog.slug().to_string();

        let image = blog.image.as_ref().map(|image| BlogImage {
            src: image.url.clone(),
            alt: crate::cms::first_present(&[
                &blog.img_alt,
                &image.alternative_text,
                &blog.title,
            ])
            .unwrap_or_default()
            .to_string(),
        });

        let author = blog.author.as_ref().map(|author| BlogAuthor {
            name: author.name.clone(),
            social: author.social.clone(),
        });

        Self {
            id: blog.id,
            path: blog_path(&slug),
            title,
            description: blog.description.clone().unwrap_or_default(),
            slug,
            featured: blog.featured.unwrap_or(false),
            image,
            author,
            published_at: blog
                .publication_timestamp()
                .map(normalize_timestamp)
                .unwrap_or_default(),
            body: blog.rich_text_body().unwrap_or_default().to_string(),
        }
    }
}

impl From<&CmsBlog> for TransformedBlog {
    fn from(blog: &CmsBlog) -> Self {
        Self::from_cms(blog)
    }
}

/// Site route for a blog slug.
#[must_use]
pub fn blog_path(slug: &str) -> String {
    format!("{BLOG_ROUTE_PREFIX}{slug}")
}

/// Normalize a CMS timestamp to UTC RFC 3339 with millisecond precision.
///
/// Date-only values become midnight UTC. Anything unparseable is returned
/// unchanged.
#[must_use]
pub fn normalize_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return midnight
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
    }
    raw.to_string()
}

/// List all blogs, newest first.
///
/// Never fails: a CMS failure is logged and yields an empty list.
pub async fn list_blogs(source: &dyn BlogSource) -> Vec<TransformedBlog> {
    match source.fetch_blogs(&BlogQuery::listing()).await {
        Ok(blogs) => {
            debug!(count = blogs.len(), "listing blogs");
            blogs.iter().map(TransformedBlog::from_cms).collect()
        }
        Err(err) => {
            error!(error = %err, "CMS error while listing blogs");
            Vec::new()
        }
    }
}

/// Look up the blogs with the given slug.
///
/// The slug is sent to the CMS as given.
///
/// # Errors
///
/// Returns [`Error::MissingInput`] for a blank slug, [`Error::BlogNotFound`]
/// when nothing matches, and [`Error::Cms`] when the CMS call fails.
pub async fn find_blog(source: &dyn BlogSource, slug: &str) -> Result<Vec<TransformedBlog>> {
    if slug.trim().is_empty() {
        return Err(Error::missing_input("slug"));
    }

    let blogs = source
        .fetch_blogs(&BlogQuery::by_slug(slug))
        .await
        .inspect_err(|err| error!(error = %err, slug, "CMS error while fetching blog"))?;

    if blogs.is_empty() {
        return Err(Error::blog_not_found(slug));
    }

    Ok(blogs.iter().map(TransformedBlog::from_cms).collect())
}
