//! `grow serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use grow_config::{CliSettings, Config};
use grow_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover grow.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Content root directory (overrides config).
    #[arg(short, long)]
    pub(crate) root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    pub(crate) host: Option<String>,

    /// Port to bind to (overrides config, default 8080).
    #[arg(short, long, env = "GROW_PORT")]
    pub(crate) port: Option<u16>,

    /// Markdown compiler executable (overrides config, default unidoc).
    #[arg(long)]
    pub(crate) compiler: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// Enable live reload (default: enabled).
    #[arg(long)]
    pub(crate) live_reload: Option<bool>,

    /// Disable live reload.
    #[arg(long, conflicts_with = "live_reload")]
    pub(crate) no_live_reload: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let live_reload_enabled = self.resolve_live_reload_enabled();
        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            root: self.root,
            compiler: self.compiler,
            live_reload_enabled,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(?config, "Loaded configuration");

        if !config.root.is_dir() {
            return Err(CliError::Server(format!(
                "Content root is not a directory: {}",
                config.root.display()
            )));
        }

        output.highlight(&startup_line(version, &config));
        output.info(&format!("Content root: {}", config.root.display()));
        output.info(&format!("Compiler: {}", compiler_line(&config)));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        if config.live_reload.enabled {
            output.info("Live reload: enabled");
        } else {
            output.info("Live reload: disabled");
        }

        let server_config = server_config_from_config(&config, version.to_owned());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Resolve `live_reload_enabled` from --live-reload/--no-live-reload flags.
    fn resolve_live_reload_enabled(&self) -> Option<bool> {
        self.no_live_reload.then_some(false).or(self.live_reload)
    }
}

/// Printed before binding, so it must not claim the port is already open.
fn startup_line(version: &str, config: &Config) -> String {
    format!(
        "grow {version} starting on http://{}:{}/",
        config.server.host, config.server.port
    )
}

/// The compiler command line as it will be run, without the document path.
fn compiler_line(config: &Config) -> String {
    std::iter::once(config.compiler.program.as_str())
        .chain(config.compiler.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
