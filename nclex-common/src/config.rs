//! Configuration loading and config file resolution
//!
//! Config file lookup priority:
//! 1. Command-line argument (highest priority)
//! 2. `NCLEX_CONFIG` environment variable
//! 3. Platform config directory (`<config dir>/nclex-hub/config.toml`)
//! 4. Compiled defaults (fallback)
//!
//! A config file named explicitly (1 or 2) must exist. The platform file is
//! optional; when absent the compiled defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "NCLEX_CONFIG";

const APP_DIR: &str = "nclex-hub";
const DATABASE_FILE: &str = "nclex_reviews.db";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Database file; platform data directory when unset
    pub database_path: Option<PathBuf>,
    pub default_per_page: u32,
    pub max_per_page: u32,
    /// Allowed CORS origins; empty means permissive
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            database_path: None,
            default_per_page: 12,
            max_per_page: 50,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Configured database path, or the platform default
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(default_database_path)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_per_page == 0 {
            return Err(Error::Config("max_per_page must be at least 1".to_string()));
        }
        if self.default_per_page == 0 || self.default_per_page > self.max_per_page {
            return Err(Error::Config(format!(
                "default_per_page must be between 1 and {}",
                self.max_per_page
            )));
        }
        Ok(())
    }
}

/// `[client]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the review API, including the `/api` prefix
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Resolves and loads the config file following the priority order above
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Locate the config file to load.
    ///
    /// Returns the path and whether it was named explicitly.
    pub fn locate(&self) -> Option<(PathBuf, bool)> {
        if let Some(path) = &self.cli_path {
            return Some((path.clone(), true));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Some((PathBuf::from(path), true));
            }
        }

        default_config_path().map(|p| (p, false))
    }

    /// Load configuration, falling back to compiled defaults
    pub fn load(&self) -> Result<TomlConfig> {
        match self.locate() {
            Some((path, explicit)) => {
                if path.exists() {
                    let config = load_config_file(&path)?;
                    info!("Loaded configuration from {}", path.display());
                    Ok(config)
                } else if explicit {
                    Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )))
                } else {
                    warn!(
                        "No config file at {}, using defaults",
                        path.display()
                    );
                    Ok(TomlConfig::default())
                }
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                Ok(TomlConfig::default())
            }
        }
    }
}

/// Parse a TOML config file
pub fn load_config_file(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Platform config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("./nclex_data"))
        .join(DATABASE_FILE)
}
