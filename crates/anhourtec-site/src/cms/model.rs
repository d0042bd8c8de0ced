//! Wire types for the CMS blog collection.
//!
//! The CMS is a Strapi-style REST API. Every field apart from `id` may be
//! missing or `null` on the wire, so everything is optional here and the
//! view transform in [`crate::blog`] supplies the fallbacks.

use serde::{Deserialize, Deserializer, Serialize};

/// Component tag of the content block that carries the article body.
pub const RICH_TEXT_COMPONENT: &str = "shared.rich-text";

/// A `{ "data": [...] }` envelope as returned by collection endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct CmsCollection<T> {
    /// The records. A missing or `null` key is an empty collection.
    #[serde(default = "Vec::new", deserialize_with = "nullable")]
    pub data: Vec<T>,
}

impl<T> Default for CmsCollection<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// A blog record as stored in the CMS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CmsBlog {
    /// Numeric record id.
    pub id: u64,
    /// Stable document id (survives drafts/publishing).
    pub document_id: Option<String>,
    /// Headline.
    pub title: Option<String>,
    /// Teaser shown on listing pages.
    pub description: Option<String>,
    /// URL slug, unique per blog.
    pub slug: Option<String>,
    /// Editor-supplied alt text for the cover image.
    #[serde(rename = "img_alt")]
    pub img_alt: Option<String>,
    /// Whether the blog is pinned on the listing.
    pub featured: Option<bool>,
    /// Editorial publication date.
    pub published_date: Option<String>,
    /// Record creation time.
    pub created_at: Option<String>,
    /// Last modification time.
    pub updated_at: Option<String>,
    /// CMS publish time.
    pub published_at: Option<String>,
    /// Cover image.
    pub image: Option<CmsImage>,
    /// Author relation.
    pub author: Option<CmsAuthor>,
    /// Dynamic-zone content blocks.
    #[serde(deserialize_with = "nullable")]
    pub blocks: Vec<ContentBlock>,
}

/// An uploaded media file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CmsImage {
    /// Media id.
    pub id: Option<u64>,
    /// Public URL of the file.
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    /// Alt text stored with the media file.
    pub alternative_text: Option<String>,
}

/// An author relation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsAuthor {
    /// Author id.
    pub id: Option<u64>,
    /// Display name.
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Contact address; never exposed to clients.
    pub email: Option<String>,
    /// Social handle or profile URL.
    pub social: Option<String>,
}

/// One entry of a blog's dynamic zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    /// Component tag, e.g. `shared.rich-text`.
    #[serde(rename = "__component", deserialize_with = "nullable")]
    pub component: String,
    /// Block id.
    pub id: Option<u64>,
    /// Markdown body for rich-text blocks.
    pub body: Option<String>,
}

impl ContentBlock {
    /// Whether this block carries rich text.
    #[must_use]
    pub fn is_rich_text(&self) -> bool {
        self.component == RICH_TEXT_COMPONENT
    }
}

impl CmsBlog {
    /// The slug, or an empty string when the record has none.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    /// Body of the first rich-text block, if any.
    #[must_use]
    pub fn rich_text_body(&self) -> Option<&str> {
        self.blocks
            .iter()
            .find(|block| block.is_rich_text())
            .and_then(|block| block.body.as_deref())
    }

    /// Publication timestamp: the editorial date, else the CMS publish time.
    #[must_use]
    pub fn publication_timestamp(&self) -> Option<&str> {
        first_present(&[&self.published_date, &self.published_at])
    }

    /// Last-modified timestamp: update time, else the editorial date.
    #[must_use]
    pub fn last_modified(&self) -> Option<&str> {
        first_present(&[&self.updated_at, &self.published_date])
    }
}

/// First non-empty value, matching how the CMS front end treats blank strings.
pub(crate) fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(|value| value.as_deref())
        .find(|value| !value.is_empty())
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
