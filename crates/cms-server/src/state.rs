//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use cms_client::PageSource;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Where page content is fetched from.
    pub(crate) source: Arc<dyn PageSource>,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
