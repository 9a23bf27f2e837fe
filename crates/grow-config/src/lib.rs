//! Configuration management for grow.
//!
//! Parses `grow.toml` with serde and discovers it in the current directory
//! or any parent. Without a file, defaults apply with the current directory
//! as content root. [`CliSettings`] override loaded values.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [content]
//! root = "notes"
//!
//! [compiler]
//! program = "unidoc"
//! args = []
//!
//! [live_reload]
//! enabled = true
//! watch_patterns = ["**/*.md", "**/*.mkd"]
//! ```
//!
//! `server.host` and `compiler.program` support `${VAR}` and
//! `${VAR:-default}` expansion.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "grow.toml";

/// Default markdown compiler.
const DEFAULT_COMPILER: &str = "unidoc";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Content root, used as given (relative to the current directory).
    pub root: Option<PathBuf>,
    pub compiler: Option<String>,
    pub live_reload_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration as written in TOML.
    content: ContentConfigRaw,
    /// Markdown compiler configuration.
    pub compiler: CompilerConfig,
    /// Live reload configuration.
    pub live_reload: LiveReloadConfig,

    /// Resolved content root (set after loading).
    #[serde(skip)]
    pub root: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
}

/// Markdown compiler invocation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Executable name or path.
    pub program: String,
    /// Arguments placed before the document path.
    pub args: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_COMPILER.to_owned(),
            args: Vec::new(),
        }
    }
}

/// Live reload configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LiveReloadConfig {
    pub enabled: bool,
    /// Glob patterns, relative to the content root, that trigger a reload.
    pub watch_patterns: Option<Vec<String>>,
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            watch_patterns: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `grow.toml` in the current directory and its parents.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(root) = &settings.root {
            self.root.clone_from(root);
        }
        if let Some(program) = &settings.compiler {
            self.compiler.program.clone_from(program);
        }
        if let Some(enabled) = settings.live_reload_enabled {
            self.live_reload.enabled = enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            compiler: CompilerConfig::default(),
            live_reload: LiveReloadConfig::default(),
            root: base.to_path_buf(),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        require_non_empty(&self.compiler.program, "compiler.program")?;

        for pattern in self.live_reload.watch_patterns.iter().flatten() {
            glob::Pattern::new(pattern).map_err(|e| {
                ConfigError::Validation(format!(
                    "live_reload.watch_patterns: invalid pattern {pattern:?}: {e}"
                ))
            })?;
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.compiler.program = expand::expand_env(&self.compiler.program, "compiler.program")?;
        Ok(())
    }

    /// Resolve the content root against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.root = match self.content.root.as_deref() {
            Some(root) => config_dir.join(root),
            None => config_dir.to_path_buf(),
        };
    }
}
