//! `anhourtec-site` - Backend and headless front-end logic for the AnHourTec website
//!
//! This library provides the CMS proxy endpoints (blog listing, blog by slug,
//! sitemap entries), the HTTP server that exposes them, and browser-free
//! models of the site's scroll, reveal and theme behaviour.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod blog;
pub mod cli;
pub mod cms;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod sitemap;
pub mod storage;
pub mod ui;

pub use blog::TransformedBlog;
pub use cms::{BlogSource, CmsClient};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use sitemap::SitemapUrl;
pub use storage::{MemoryPreferences, PreferenceStore, SqlitePreferences};
