//! Error types for anhourtec-site.
//!
//! This module defines the crate-wide error type. CMS failures have their own
//! [`CmsError`](crate::cms::CmsError) and HTTP-facing failures are mapped by
//! [`ApiError`](crate::server::ApiError); both fold into [`Error`] here.

use std::path::PathBuf;
use thiserror::Error;

use crate::cms::CmsError;

/// The main error type for anhourtec-site operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the preferences database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The database was written with an unsupported schema.
    #[error("unsupported database schema: {message}")]
    DatabaseSchema {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Content Errors ===
    /// A required input was missing or blank.
    #[error("{field} is required")]
    MissingInput {
        /// Name of the missing input.
        field: &'static str,
    },

    /// The CMS could not be reached or answered with an error.
    #[error(transparent)]
    Cms(#[from] CmsError),

    /// A blog with the requested slug does not exist.
    #[error("blog not found: {slug}")]
    BlogNotFound {
        /// The slug that was looked up.
        slug: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    ServerBind {
        /// Address that was requested.
        addr: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === UI Errors ===
    /// A theme mode string was neither `light` nor `dark`.
    #[error("invalid theme mode '{value}' (expected 'light' or 'dark')")]
    InvalidThemeMode {
        /// The rejected value.
        value: String,
    },

    /// A root margin string could not be parsed.
    #[error("invalid root margin '{value}'")]
    InvalidRootMargin {
        /// The rejected value.
        value: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for anhourtec-site operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create a missing-input error.
    #[must_use]
    pub fn missing_input(field: &'static str) -> Self {
        Self::MissingInput { field }
    }

    /// Create a blog-not-found error.
    #[must_use]
    pub fn blog_not_found(slug: impl Into<String>) -> Self {
        Self::BlogNotFound { slug: slug.into() }
    }

    /// Check if this error means the requested content does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BlogNotFound { .. })
    }

    /// Check if this error originated in the CMS.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Cms(_))
    }
}
