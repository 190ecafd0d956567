//! Configuration for the `todos-server` binary.
//!
//! Layered with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/todos-server/config.toml`)
//! 4. Compiled defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use todos_proto::task::MAX_TASK_TITLE_LENGTH;

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerConfigFile {
    server: ServerFileConfig,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileConfig {
    bind_addr: Option<String>,
    latency_ms: Option<u64>,
    max_title_len: Option<usize>,
}

/// CLI arguments for the server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Reference REST backend for todos")]
pub struct ServerCliArgs {
    /// Address to bind to.
    #[arg(short, long, env = "TODOS_SERVER_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/todos-server/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Artificial delay added to every request, in milliseconds.
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Maximum title length in characters.
    #[arg(long)]
    pub max_title_len: Option<usize>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TODOS_SERVER_LOG")]
    pub log_level: String,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: String,
    /// Artificial per-request latency.
    pub latency: Duration,
    /// Maximum title length in characters.
    pub max_title_len: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            latency: Duration::ZERO,
            max_title_len: MAX_TASK_TITLE_LENGTH,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or if any config file fails to parse.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    fn resolve(cli: &ServerCliArgs, file: &ServerConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            latency: cli
                .latency_ms
                .or(file.server.latency_ms)
                .map_or(defaults.latency, Duration::from_millis),
            max_title_len: cli
                .max_title_len
                .or(file.server.max_title_len)
                .unwrap_or(defaults.max_title_len),
            log_level: cli.log_level.clone(),
        }
    }
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ServerConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ServerConfigFile::default());
    };
    let path = config_dir.join("todos-server").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
