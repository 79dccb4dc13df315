use crate::config::Config;
use crate::sorter::{SortOptions, SortOverrides};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Resolves options for one request: built-in defaults, then server config, then the request.
    pub fn resolve_options(&self, request: &SortOverrides) -> SortOptions {
        SortOptions::default()
            .merged(&self.config.sort_defaults)
            .merged(request)
    }
}
