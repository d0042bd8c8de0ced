//! HTTP server.
//!
//! Serves the CMS proxy endpoints, the sitemap, robots.txt and a health
//! check. Handlers are thin: they call into [`crate::blog`] and
//! [`crate::sitemap`] and map failures to [`ApiError`].

pub mod handlers;
pub mod router;
pub mod state;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cms::CmsClient;
use crate::config::Config;
use crate::error::{Error, Result};

pub use router::create_router;
pub use state::AppState;

/// An error returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A required input was missing or blank.
    MissingInput(String),
    /// The requested resource does not exist.
    NotFound(String),
    /// The CMS failed. Carries its status when it answered with one.
    Upstream {
        /// Status to respond with.
        status: StatusCode,
        /// Client-facing message.
        message: String,
    },
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { status, .. } => *status,
        }
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::MissingInput(message) | Self::NotFound(message) => message,
            Self::Upstream { message, .. } => message,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::MissingInput { field } => Self::MissingInput(format!(
                "{} is required",
                capitalize(field)
            )),
            Error::BlogNotFound { .. } => Self::NotFound("Blog not found".to_string()),
            Error::Cms(cause) => Self::Upstream {
                status: cause
                    .upstream_status()
                    .and_then(|status| StatusCode::from_u16(status).ok())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message: format!("Failed to fetch blog: {cause}"),
            },
            other => Self::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    status_code: u16,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Run the server until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the bind address is invalid, the CMS client cannot
/// be built, the listener cannot bind, or the server fails.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let client = CmsClient::new(&config.cms)?;
    info!(cms = client.blogs_url(), "Using CMS");

    let app = create_router(AppState::new(config, Arc::new(client)));

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::ServerBind {
            addr: addr.to_string(),
            source,
        })?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down gracefully...");
}
