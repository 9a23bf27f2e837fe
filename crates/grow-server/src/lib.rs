//! HTTP server for grow.
//!
//! Serves a tree of markdown documents as HTML pages, one page per request
//! path, with optional live reload over WebSocket.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use grow_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root: PathBuf::from("notes"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (grow-server)
//!                        │
//!                        ├─► GET /{*path} ──► spawn_blocking ──► PageRenderer (grow-site)
//!                        │                                          ├─► DirectoryLister
//!                        │                                          └─► external compiler
//!                        │
//!                        └─► WebSocket /ws/live-reload ◄── LiveReloadManager ◄── notify
//! ```

mod app;
mod error;
mod handlers;
mod html;
mod live_reload;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use grow_site::{CommandCompiler, PageRenderer};
use state::AppState;
use tokio::sync::broadcast;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Content root all request paths resolve against.
    pub root: PathBuf,
    /// Markdown compiler executable.
    pub compiler_program: String,
    /// Arguments placed before the document path.
    pub compiler_args: Vec<String>,
    /// Enable live reload.
    pub live_reload_enabled: bool,
    /// Watch patterns for live reload.
    pub watch_patterns: Option<Vec<String>>,
    /// Application version.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            root: PathBuf::from("."),
            compiler_program: "unidoc".to_owned(),
            compiler_args: Vec::new(),
            live_reload_enabled: true,
            watch_patterns: None,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid, the port cannot be bound or
/// the file watcher cannot be started.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let compiler = CommandCompiler::new(config.compiler_program.clone(), config.root.clone())
        .with_args(config.compiler_args.clone());
    let renderer = PageRenderer::new(config.root.clone(), Arc::new(compiler));

    let live_reload = if config.live_reload_enabled {
        let (tx, _rx) = broadcast::channel::<live_reload::ReloadEvent>(100);
        let mut manager = live_reload::LiveReloadManager::new(
            config.root.clone(),
            config.watch_patterns.clone(),
            tx,
        );
        manager.start()?;
        Some(manager)
    } else {
        None
    };

    let state = Arc::new(AppState {
        renderer,
        live_reload,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, root = %config.root.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl-C.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from grow config.
#[must_use]
pub fn server_config_from_config(config: &grow_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        root: config.root.clone(),
        compiler_program: config.compiler.program.clone(),
        compiler_args: config.compiler.args.clone(),
        live_reload_enabled: config.live_reload.enabled,
        watch_patterns: config.live_reload.watch_patterns.clone(),
        version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_server_config_from_config() {
        let mut config = grow_config::Config::default();
        config.server.port = 9100;
        config.root = PathBuf::from("/notes");
        config.compiler.program = "pandoc".to_owned();
        config.compiler.args = vec!["--to=html".to_owned()];

        let server_config = server_config_from_config(&config, "1.2.3".to_owned());

        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 9100);
        assert_eq!(server_config.root, Path::new("/notes"));
        assert_eq!(server_config.compiler_program, "pandoc");
        assert_eq!(server_config.compiler_args, vec!["--to=html"]);
        assert!(server_config.live_reload_enabled);
        assert_eq!(server_config.version, "1.2.3");
    }

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();

        assert_eq!(config.port, 8080);
        assert_eq!(config.compiler_program, "unidoc");
        assert_eq!(
            config.live_reload_enabled,
            grow_config::LiveReloadConfig::default().enabled
        );
    }
}
