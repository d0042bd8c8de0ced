//! Shared application state.

use std::sync::Arc;

use crate::cms::BlogSource;
use crate::config::Config;

/// State shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

#[derive(Debug)]
struct InnerState {
    config: Config,
    source: Arc<dyn BlogSource>,
}

impl AppState {
    /// Create state serving blogs from `source`.
    #[must_use]
    pub fn new(config: Config, source: Arc<dyn BlogSource>) -> Self {
        Self {
            inner: Arc::new(InnerState { config, source }),
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The blog source.
    #[must_use]
    pub fn source(&self) -> &dyn BlogSource {
        self.inner.source.as_ref()
    }
}
