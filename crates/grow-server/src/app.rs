//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::live_reload;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/live-reload.js", get(live_reload::client_script));

    if state.live_reload_enabled() {
        router = router.route("/ws/live-reload", get(live_reload::ws_handler));
    }

    // Pages of any depth; registered last so the fixed routes above win
    router = router
        .route("/", get(handlers::pages::get_root_page))
        .route("/{*path}", get(handlers::pages::get_page));

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use grow_site::{CompileError, CompileResult, Compiler, PageRenderer, PathNode};
    use tower::ServiceExt;

    /// Compiler echoing the requested path inside a paragraph.
    struct EchoCompiler;

    impl Compiler for EchoCompiler {
        fn compile(&self, file: &PathNode) -> Result<CompileResult, CompileError> {
            if file.to_string().contains("broken") {
                return Ok(CompileResult {
                    status: 2,
                    stdout: String::new(),
                    stderr: "parse error: <line 3>".to_owned(),
                });
            }
            Ok(CompileResult {
                status: 0,
                stdout: format!("<p>compiled {file}</p>"),
                stderr: String::new(),
            })
        }
    }

    fn test_state(root: &Path) -> Arc<AppState> {
        Arc::new(AppState {
            renderer: PageRenderer::new(root, Arc::new(EchoCompiler)),
            live_reload: None,
            version: "0.0.0-test".to_owned(),
        })
    }

    fn docs_tree() -> tempfile::TempDir {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("docs/sub")).unwrap();
        fs::write(temp_dir.path().join("docs/a.md"), "# A\n").unwrap();
        fs::write(temp_dir.path().join("docs/broken.md"), "# B\n").unwrap();
        fs::write(temp_dir.path().join("docs/sub/b.md"), "# B\n").unwrap();
        temp_dir
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_directory_page() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (status, headers, body) = fetch(router, "/docs").await;

        assert_eq!(status, StatusCode::OK);
        assert!(
            headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        assert!(body.contains("<title>docs/ - grow.md</title>"));
        assert!(body.contains(r#"href="/docs/a.md""#));
        assert!(body.contains(r#"href="/docs/sub/""#));
        assert!(body.contains(r#"<div class="notification is-info">docs/</div>"#));
        assert!(!body.contains("compiled"));
    }

    #[tokio::test]
    async fn test_file_page_embeds_markup() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (status, _, body) = fetch(router, "/docs/a.md").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<div class="content"><p>compiled docs/a.md</p></div>"#));
        assert!(body.contains(r#"href="/docs/sub/""#));
    }

    #[tokio::test]
    async fn test_failed_compile_is_escaped() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (status, _, body) = fetch(router, "/docs/broken.md").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(
            r#"<div class="notification is-danger">parse error: &lt;line 3&gt;</div>"#
        ));
    }

    #[tokio::test]
    async fn test_root_page() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (status, _, body) = fetch(router, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"href="/docs/""#));
        assert!(body.contains(r#"href="/../""#));
    }

    #[tokio::test]
    async fn test_deep_path_is_routed() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (status, _, body) = fetch(router, "/a/b/c/d/e/f.md").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("compiled a/b/c/d/e/f.md"));
    }

    #[tokio::test]
    async fn test_security_headers() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (_, headers, _) = fetch(router, "/docs").await;

        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers.contains_key("content-security-policy"));
    }

    #[tokio::test]
    async fn test_page_omits_reload_script_when_disabled() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (_, _, body) = fetch(router, "/docs").await;

        assert!(!body.contains("/live-reload.js"));
    }

    #[tokio::test]
    async fn test_client_script() {
        let temp_dir = docs_tree();
        let router = create_router(test_state(temp_dir.path()));

        let (status, headers, body) = fetch(router, "/live-reload.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/javascript; charset=utf-8");
        assert!(body.contains("/ws/live-reload"));
    }
}
