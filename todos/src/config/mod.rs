//! Configuration for the `todos` client.
//!
//! Layered with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/todos/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file is not an error. An explicit `--config`
//! path that doesn't exist is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use todos_proto::filter::Filter;
use todos_proto::task::OwnerId;

use crate::controller::ControllerConfig;
use crate::state::{BusyRelease, SessionPolicy};

/// Errors that can occur when loading configuration.
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

    /// No owner id from CLI, environment, or file.
    #[error("no owner id configured (pass --owner-id, set TODOS_OWNER_ID, or set [remote] owner_id)")]
    MissingOwner,
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    remote: RemoteFileConfig,
    edit: EditFileConfig,
    busy: BusyFileConfig,
    ui: UiFileConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct RemoteFileConfig {
    base_url: Option<String>,
    owner_id: Option<u32>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct EditFileConfig {
    session_policy: Option<SessionPolicy>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BusyFileConfig {
    release: Option<BusyRelease>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    initial_filter: Option<Filter>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    // -- Remote --
    /// Base URL of the todo REST service.
    pub base_url: String,
    /// Owner whose list is shown. Required to start.
    pub owner_id: Option<OwnerId>,
    /// Per-request timeout.
    pub request_timeout: Duration,

    // -- Behaviour --
    /// What starting a second edit session does.
    pub session_policy: SessionPolicy,
    /// How busy markers are released.
    pub busy_release: BusyRelease,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Filter selected at startup.
    pub initial_filter: Filter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            owner_id: None,
            request_timeout: Duration::from_secs(10),
            session_policy: SessionPolicy::default(),
            busy_release: BusyRelease::default(),
            poll_timeout: Duration::from_millis(50),
            initial_filter: Filter::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or if any config file fails to parse.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| file.remote.base_url.clone())
                .unwrap_or(defaults.base_url),
            // Id 0 means "not configured".
            owner_id: cli
                .owner_id
                .or(file.remote.owner_id)
                .filter(|&id| id != 0)
                .map(OwnerId::new),
            request_timeout: file
                .remote
                .request_timeout_secs
                .map_or(defaults.request_timeout, Duration::from_secs),
            session_policy: file
                .edit
                .session_policy
                .unwrap_or(defaults.session_policy),
            busy_release: file.busy.release.unwrap_or(defaults.busy_release),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            initial_filter: cli
                .filter
                .or(file.ui.initial_filter)
                .unwrap_or(defaults.initial_filter),
        }
    }

    /// Build the [`ControllerConfig`] for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOwner`] when no owner id was configured.
    pub fn controller_config(&self) -> Result<ControllerConfig, ConfigError> {
        let owner = self.owner_id.ok_or(ConfigError::MissingOwner)?;
        Ok(ControllerConfig {
            owner,
            session_policy: self.session_policy,
            busy_release: self.busy_release,
            initial_filter: self.initial_filter,
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal todo list with optimistic editing")]
pub struct CliArgs {
    /// Base URL of the todo REST service.
    #[arg(long, env = "TODOS_BASE_URL")]
    pub base_url: Option<String>,

    /// Owner id whose todos are shown.
    #[arg(long, env = "TODOS_OWNER_ID")]
    pub owner_id: Option<u32>,

    /// Initial filter (all, active, completed).
    #[arg(long)]
    pub filter: Option<Filter>,

    /// Path to config file (default: `~/.config/todos/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run against a seeded in-process store instead of the network.
    #[arg(long)]
    pub demo: bool,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TODOS_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/todos.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("todos").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
