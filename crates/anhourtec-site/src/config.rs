//! Configuration management for anhourtec-site.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ui::easing::Easing;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "anhourtec";

/// Default preferences database file name.
const DATABASE_FILE_NAME: &str = "preferences.db";

/// Prefix for environment overrides, e.g. `ANHOURTEC_CMS__BASE_URL`.
const ENV_PREFIX: &str = "ANHOURTEC_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ANHOURTEC_`, sections split on `__`)
/// 2. TOML config file at `~/.config/anhourtec/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// CMS connection configuration.
    pub cms: CmsConfig,
    /// Site identity and SEO metadata.
    pub site: SiteConfig,
    /// robots.txt rules.
    pub robots: RobotsConfig,
    /// Sitemap configuration.
    pub sitemap: SitemapConfig,
    /// Preference storage configuration.
    pub storage: StorageConfig,
    /// Default smooth-scroll behaviour.
    pub scroll: ScrollConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
}

/// CMS connection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// Base URL of the CMS, without the `/api` suffix.
    pub base_url: String,
    /// Path of the blog collection relative to the base URL.
    pub blogs_path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Site identity and SEO metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical public URL.
    pub url: String,
    /// Site name.
    pub name: String,
    /// Default meta description.
    pub description: String,
    /// Default locale.
    pub default_locale: String,
}

/// robots.txt rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotsConfig {
    /// Paths crawlers may visit.
    pub allow: Vec<String>,
    /// Paths crawlers must skip.
    pub disallow: Vec<String>,
}

/// Sitemap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Serve `/sitemap.xml`.
    pub enabled: bool,
}

/// Preference storage configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the preferences database.
    /// Defaults to `~/.local/share/anhourtec/preferences.db`
    pub database_path: Option<PathBuf>,
}

/// Default smooth-scroll behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Animation duration in milliseconds.
    pub duration_ms: u64,
    /// Easing curve.
    pub easing: Easing,
    /// Pixels subtracted from element targets (e.g. a fixed header).
    pub offset: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://content.iotkinect.com".to_string(),
            blogs_path: "/api/blogs".to_string(),
            timeout_secs: 10,
        }
    }
}

impl CmsConfig {
    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://anhourtec.com".to_string(),
            name: "AnHourTec".to_string(),
            description: "Your trusted technology partner in Victoria, BC. We deliver \
                innovative software solutions and reliable IT infrastructure services."
                .to_string(),
            default_locale: "en".to_string(),
        }
    }
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            allow: vec!["/".to_string()],
            disallow: Vec::new(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            easing: Easing::EaseInOut,
            offset: 0.0,
        }
    }
}

impl ScrollConfig {
    /// Get the animation duration as a Duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(Error::config_validation(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            )));
        }

        for (key, url) in [("cms.base_url", &self.cms.base_url), ("site.url", &self.site.url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::config_validation(format!(
                    "{key} must be an http(s) URL: {url}"
                )));
            }
        }

        if self.cms.timeout_secs == 0 {
            return Err(Error::config_validation(
                "cms.timeout_secs must be greater than 0",
            ));
        }

        if self.scroll.duration_ms == 0 {
            return Err(Error::config_validation(
                "scroll.duration_ms must be greater than 0",
            ));
        }

        for path in self.robots.allow.iter().chain(&self.robots.disallow) {
            if !path.starts_with('/') {
                return Err(Error::config_validation(format!(
                    "robots paths must start with '/': {path}"
                )));
            }
        }

        Ok(())
    }

    /// Get the bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if `server.bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|_| {
            Error::config_validation(format!(
                "server.bind is not a socket address: {}",
                self.server.bind
            ))
        })
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Absolute sitemap URL advertised in robots.txt.
    #[must_use]
    pub fn sitemap_url(&self) -> String {
        format!("{}/sitemap.xml", self.site.url.trim_end_matches('/'))
    }
}
