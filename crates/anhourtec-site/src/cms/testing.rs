//! In-memory blog sources for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{
    BlogQuery, BlogSource, CmsBlog, CmsCollection, CmsError, ContentBlock, RICH_TEXT_COMPONENT,
};

/// Answers queries from a fixed set of records, applying the slug filter and
/// newest-first sort the CMS would apply.
#[derive(Debug, Default)]
pub(crate) struct MemorySource {
    blogs: Vec<CmsBlog>,
    calls: AtomicUsize,
}

impl MemorySource {
    pub(crate) fn new(blogs: Vec<CmsBlog>) -> Self {
        Self {
            blogs,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BlogSource for MemorySource {
    async fn fetch_blogs(&self, query: &BlogQuery) -> Result<Vec<CmsBlog>, CmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut blogs: Vec<CmsBlog> = self
            .blogs
            .iter()
            .filter(|blog| query.slug.as_deref().is_none_or(|slug| blog.slug() == slug))
            .cloned()
            .collect();
        if query.sort.is_some() {
            blogs.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        }
        Ok(blogs)
    }
}

/// Always fails with a status error.
#[derive(Debug)]
pub(crate) struct FailingSource {
    pub(crate) status: u16,
}

#[async_trait::async_trait]
impl BlogSource for FailingSource {
    async fn fetch_blogs(&self, _query: &BlogQuery) -> Result<Vec<CmsBlog>, CmsError> {
        Err(CmsError::status(self.status, "upstream unavailable"))
    }
}

/// Always fails without an HTTP status (e.g. a malformed body).
#[derive(Debug)]
pub(crate) struct GarbageSource;

#[async_trait::async_trait]
impl BlogSource for GarbageSource {
    async fn fetch_blogs(&self, _query: &BlogQuery) -> Result<Vec<CmsBlog>, CmsError> {
        let err = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        Err(CmsError::Decode(err))
    }
}

/// Decodes a fixed response body the way the HTTP client does.
#[derive(Debug)]
pub(crate) struct JsonSource {
    body: String,
}

impl JsonSource {
    pub(crate) fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

#[async_trait::async_trait]
impl BlogSource for JsonSource {
    async fn fetch_blogs(&self, _query: &BlogQuery) -> Result<Vec<CmsBlog>, CmsError> {
        let collection: CmsCollection<CmsBlog> = serde_json::from_str(&self.body)?;
        Ok(collection.data)
    }
}

/// A fully populated record.
pub(crate) fn sample_blog(id: u64, slug: &str, published: &str) -> CmsBlog {
    CmsBlog {
        id,
        document_id: Some(format!("doc-{id}")),
        title: Some(format!("Title {id}")),
        description: Some(format!("Description {id}")),
        slug: Some(slug.to_string()),
        featured: Some(id % 2 == 0),
        published_date: Some(published.to_string()),
        updated_at: Some(published.to_string()),
        published_at: Some(published.to_string()),
        blocks: vec![ContentBlock {
            component: RICH_TEXT_COMPONENT.to_string(),
            id: Some(id),
            body: Some(format!("Body {id}")),
        }],
        ..CmsBlog::default()
    }
}
