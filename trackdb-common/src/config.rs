//! Bootstrap configuration and path resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "TRACKDB_DATABASE";

/// Environment variable overriding the HTTP bind address
pub const BIND_ENV_VAR: &str = "TRACKDB_BIND";

/// Default HTTP bind address for trackdb-api
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5780";

/// File name of the SQLite store inside the data directory
pub const DATABASE_FILE_NAME: &str = "tracks.db";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional; a missing file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP bind address (`host:port`)
    #[serde(default)]
    pub bind_addr: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter (trace, debug, info, warn, error or a full directive)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BootstrapConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load an explicit config file, or the platform config file if one exists.
    ///
    /// An explicit path that cannot be read is an error. A missing platform
    /// file is not: defaults are used.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_file() {
            Some(path) => match Self::load(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config file");
                    Ok(config)
                }
                Err(e) => {
                    warn!("Ignoring unreadable config file: {}", e);
                    Ok(Self::default())
                }
            },
            None => Ok(Self::default()),
        }
    }
}

/// Resolve the database path (CLI > env > TOML > `<data dir>/tracks.db`)
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &BootstrapConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.database_path {
        return path.clone();
    }

    default_data_dir().join(DATABASE_FILE_NAME)
}

/// Resolve the HTTP bind address (CLI > env > TOML > [`DEFAULT_BIND_ADDR`])
pub fn resolve_bind_addr(
    cli_arg: Option<&str>,
    env_var_name: &str,
    config: &BootstrapConfig,
) -> String {
    if let Some(addr) = cli_arg {
        return addr.to_string();
    }

    if let Ok(addr) = std::env::var(env_var_name) {
        if !addr.is_empty() {
            return addr;
        }
    }

    config
        .bind_addr
        .clone()
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
}

/// OS-dependent data directory
///
/// `~/.local/share/trackdb`, `~/Library/Application Support/trackdb` or
/// `%LOCALAPPDATA%\trackdb`.
pub fn default_data_dir() -> PathBuf {
    let fallback = if cfg!(target_os = "windows") {
        "C:\\ProgramData\\trackdb"
    } else {
        "./trackdb_data"
    };

    dirs::data_local_dir()
        .map(|d| d.join("trackdb"))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Platform config file, if one exists
fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("trackdb").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/trackdb/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
