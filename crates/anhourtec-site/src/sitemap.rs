//! Sitemap generation.
//!
//! The URL source lists the static marketing routes plus one entry per CMS
//! blog. It backs the JSON endpoint consumed by sitemap tooling and the
//! rendered `sitemap.xml`.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://anhourtec.com/</loc>
//!     <changefreq>weekly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::blog::blog_path;
use crate::cms::{BlogQuery, BlogSource};
use crate::config::Config;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Priority of blog entries.
const BLOG_PRIORITY: f32 = 0.6;

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    /// Changes daily.
    Daily,
    /// Changes weekly.
    Weekly,
    /// Changes monthly.
    Monthly,
    /// Changes yearly.
    Yearly,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

/// One sitemap entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapUrl {
    /// Site-relative route.
    pub loc: String,
    /// Relative priority, 0.0 to 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f32>,
    /// Expected change frequency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastmod: Option<String>,
}

impl SitemapUrl {
    fn fixed(loc: &str, priority: f32, changefreq: ChangeFreq) -> Self {
        Self {
            loc: loc.to_string(),
            priority: Some(priority),
            changefreq: Some(changefreq),
            lastmod: None,
        }
    }
}

/// The static marketing routes.
#[must_use]
pub fn static_pages() -> Vec<SitemapUrl> {
    vec![
        SitemapUrl::fixed("/", 1.0, ChangeFreq::Weekly),
        SitemapUrl::fixed("/about", 0.8, ChangeFreq::Monthly),
        SitemapUrl::fixed("/services", 0.9, ChangeFreq::Monthly),
        SitemapUrl::fixed("/blog", 0.8, ChangeFreq::Daily),
        SitemapUrl::fixed("/contact", 0.8, ChangeFreq::Monthly),
    ]
}

/// Collect every sitemap URL.
///
/// Static routes always come first. Blogs without a slug are skipped, and a
/// CMS failure leaves only the static routes.
pub async fn sitemap_urls(source: &dyn BlogSource, now: DateTime<Utc>) -> Vec<SitemapUrl> {
    let mut urls = static_pages();

    match source.fetch_blogs(&BlogQuery::sitemap()).await {
        Ok(blogs) => {
            let fallback = now.to_rfc3339_opts(SecondsFormat::Millis, true);
            urls.extend(
                blogs
                    .iter()
                    .filter(|blog| !blog.slug().is_empty())
                    .map(|blog| SitemapUrl {
                        loc: blog_path(blog.slug()),
                        priority: Some(BLOG_PRIORITY),
                        changefreq: Some(ChangeFreq::Monthly),
                        lastmod: Some(
                            blog.last_modified()
                                .map_or_else(|| fallback.clone(), str::to_string),
                        ),
                    }),
            );
            debug!(count = urls.len(), "sitemap urls collected");
        }
        Err(err) => {
            warn!(
                error = %err,
                "CMS error while generating sitemap urls; serving static routes only"
            );
        }
    }

    urls
}

/// Render a sitemap document with absolute URLs under `base_url`.
#[must_use]
pub fn render_xml(urls: &[SitemapUrl], base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut xml = String::with_capacity(256 + urls.len() * 160);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in urls {
        let loc = if entry.loc.starts_with('/') {
            Cow::Owned(format!("{base_url}{}", entry.loc))
        } else {
            Cow::Borrowed(entry.loc.as_str())
        };

        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&loc));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str("    <lastmod>");
            xml.push_str(&escape_xml(lastmod));
            xml.push_str("</lastmod>\n");
        }
        if let Some(changefreq) = entry.changefreq {
            xml.push_str(&format!("    <changefreq>{changefreq}</changefreq>\n"));
        }
        if let Some(priority) = entry.priority {
            xml.push_str(&format!("    <priority>{priority:.1}</priority>\n"));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render robots.txt from the robots section of the config.
#[must_use]
pub fn render_robots(config: &Config) -> String {
    let mut robots = String::from("User-agent: *\n");
    for path in &config.robots.allow {
        robots.push_str(&format!("Allow: {path}\n"));
    }
    for path in &config.robots.disallow {
        robots.push_str(&format!("Disallow: {path}\n"));
    }
    if config.sitemap.enabled {
        robots.push_str(&format!("\nSitemap: {}\n", config.sitemap_url()));
    }
    robots
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::testing::{sample_blog, FailingSource, GarbageSource, MemorySource};
    use crate::cms::CmsBlog;
    use chrono::TimeZone;

    const STATIC_ROUTES: [&str; 5] = ["/", "/about", "/services", "/blog", "/contact"];

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    fn locs(urls: &[SitemapUrl]) -> Vec<&str> {
        urls.iter().map(|u| u.loc.as_str()).collect()
    }

    #[test]
    fn test_static_pages() {
        let pages = static_pages();
        assert_eq!(locs(&pages), STATIC_ROUTES.to_vec());
        assert_eq!(pages[0].priority, Some(1.0));
        assert_eq!(pages[3].changefreq, Some(ChangeFreq::Daily));
        assert!(pages.iter().all(|p| p.lastmod.is_none()));
    }

    #[tokio::test]
    async fn test_sitemap_includes_blogs_after_static_routes() {
        let source = MemorySource::new(vec![
            sample_blog(1, "first", "2025-01-01T00:00:00Z"),
            sample_blog(2, "second", "2025-02-01T00:00:00Z"),
        ]);
        let urls = sitemap_urls(&source, now()).await;

        assert_eq!(urls.len(), 7);
        assert_eq!(locs(&urls[..5]), STATIC_ROUTES.to_vec());
        assert_eq!(urls[5].loc, "/blog/second");
        assert_eq!(urls[5].priority, Some(0.6));
        assert_eq!(urls[5].changefreq, Some(ChangeFreq::Monthly));
        assert_eq!(urls[5].lastmod.as_deref(), Some("2025-02-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_sitemap_skips_blogs_without_slug() {
        let source = MemorySource::new(vec![
            CmsBlog {
                id: 1,
                slug: None,
                ..CmsBlog::default()
            },
            CmsBlog {
                id: 2,
                slug: Some(String::new()),
                ..CmsBlog::default()
            },
        ]);
        let urls = sitemap_urls(&source, now()).await;
        assert_eq!(locs(&urls), STATIC_ROUTES.to_vec());
    }

    #[tokio::test]
    async fn test_sitemap_lastmod_fallbacks() {
        let source = MemorySource::new(vec![
            CmsBlog {
                id: 1,
                slug: Some("dated".to_string()),
                published_date: Some("2025-05-05".to_string()),
                ..CmsBlog::default()
            },
            CmsBlog {
                id: 2,
                slug: Some("undated".to_string()),
                ..CmsBlog::default()
            },
        ]);
        let urls = sitemap_urls(&source, now()).await;
        let dated = urls.iter().find(|u| u.loc == "/blog/dated").unwrap();
        let undated = urls.iter().find(|u| u.loc == "/blog/undated").unwrap();

        assert_eq!(dated.lastmod.as_deref(), Some("2025-05-05"));
        assert_eq!(undated.lastmod.as_deref(), Some("2026-01-02T03:04:05.000Z"));
    }

    #[tokio::test]
    async fn test_sitemap_keeps_static_routes_on_cms_failure() {
        let urls = sitemap_urls(&FailingSource { status: 500 }, now()).await;
        assert_eq!(locs(&urls), STATIC_ROUTES.to_vec());

        let urls = sitemap_urls(&GarbageSource, now()).await;
        assert_eq!(locs(&urls), STATIC_ROUTES.to_vec());
    }

    #[test]
    fn test_sitemap_url_json_omits_empty_fields() {
        let json = serde_json::to_value(&static_pages()[0]).unwrap();
        assert_eq!(json["loc"], "/");
        assert_eq!(json["changefreq"], "weekly");
        assert!(json.get("lastmod").is_none());
    }

    #[test]
    fn test_render_xml_structure() {
        let xml = render_xml(&static_pages(), "https://example.com/");

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(lines.last().unwrap().trim(), "</urlset>");
        assert_eq!(xml.matches("<url>").count(), 5);
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/services</loc>"));
        assert!(xml.contains("<priority>0.9</priority>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
    }

    #[test]
    fn test_render_xml_lastmod_and_escaping() {
        let urls = vec![SitemapUrl {
            loc: "/blog/a&b".to_string(),
            priority: None,
            changefreq: None,
            lastmod: Some("2025-01-01".to_string()),
        }];
        let xml = render_xml(&urls, "https://example.com");

        assert!(xml.contains("<loc>https://example.com/blog/a&amp;b</loc>"));
        assert!(xml.contains("<lastmod>2025-01-01</lastmod>"));
        assert!(!xml.contains("<priority>"));
    }

    #[test]
    fn test_render_xml_keeps_absolute_locs() {
        let urls = vec![SitemapUrl {
            loc: "https://other.example.com/page".to_string(),
            priority: None,
            changefreq: None,
            lastmod: None,
        }];
        let xml = render_xml(&urls, "https://example.com");
        assert!(xml.contains("<loc>https://other.example.com/page</loc>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_render_robots() {
        let mut config = Config::default();
        config.robots.disallow = vec!["/admin".to_string()];
        let robots = render_robots(&config);

        assert!(robots.starts_with("User-agent: *\n"));
        assert!(robots.contains("Allow: /\n"));
        assert!(robots.contains("Disallow: /admin\n"));
        assert!(robots.contains("Sitemap: https://anhourtec.com/sitemap.xml"));
    }

    #[test]
    fn test_render_robots_without_sitemap() {
        let mut config = Config::default();
        config.sitemap.enabled = false;
        assert!(!render_robots(&config).contains("Sitemap:"));
    }
}
