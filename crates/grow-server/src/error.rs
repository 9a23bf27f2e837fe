//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Server error type.
///
/// Page rendering itself cannot fail; these cover the plumbing around it.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// The blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    RenderTask(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
