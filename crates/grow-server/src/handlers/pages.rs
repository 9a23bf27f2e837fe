//! Page endpoint.
//!
//! Every GET outside the fixed routes lands here. The request path is handed
//! to the page pipeline as-is and the result is wrapped in the HTML chrome.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::error::ServerError;
use crate::html;
use crate::state::AppState;

/// Handle GET / (content root).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    render(String::new(), state).await
}

/// Handle GET /{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    render(path, state).await
}

/// Render on the blocking pool: the compiler is a synchronous child process.
async fn render(path: String, state: Arc<AppState>) -> Result<impl IntoResponse, ServerError> {
    let page = tokio::task::spawn_blocking({
        let state = Arc::clone(&state);
        move || state.renderer.render(&path)
    })
    .await?;

    let document = html::render_page(&page, &state.version, state.live_reload_enabled());

    Ok((
        [(header::CACHE_CONTROL, "no-store")],
        Html(document),
    ))
}
