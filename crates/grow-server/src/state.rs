//! Application state.
//!
//! Shared state for all request handlers.

use grow_site::PageRenderer;

use crate::live_reload::LiveReloadManager;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Request pipeline for pages.
    pub(crate) renderer: PageRenderer,
    /// Live reload manager (if enabled).
    pub(crate) live_reload: Option<LiveReloadManager>,
    /// Application version, emitted as the page's `generator` meta tag.
    pub(crate) version: String,
}

impl AppState {
    #[must_use]
    pub(crate) fn live_reload_enabled(&self) -> bool {
        self.live_reload.is_some()
    }
}
