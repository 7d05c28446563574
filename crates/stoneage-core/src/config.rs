//! Runtime configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `config.toml` in the user config directory (or `$STONEAGE_CONFIG`)
//! 3. environment variables (`STONEAGE_DATA_DIR`, `STONEAGE_STORE`,
//!    `STONEAGE_LOG_FORMAT`, `STONEAGE_SEARCH_LIMIT`)
//!
//! Command-line flags are applied on top by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CompanionError, Result};
use crate::pet::DEFAULT_SEARCH_LIMIT;

const APP_DIR: &str = "stoneage";
const CONFIG_FILE: &str = "config.toml";
const STORE_FILE: &str = "saved.json";

pub const ENV_CONFIG: &str = "STONEAGE_CONFIG";
pub const ENV_DATA_DIR: &str = "STONEAGE_DATA_DIR";
pub const ENV_STORE: &str = "STONEAGE_STORE";
pub const ENV_LOG_FORMAT: &str = "STONEAGE_LOG_FORMAT";
pub const ENV_SEARCH_LIMIT: &str = "STONEAGE_SEARCH_LIMIT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Directory holding `pets.json`, `boarding.json` and `pet-riding.json`.
    pub data_dir: PathBuf,
    /// JSON file backing the saved-entry store.
    pub store_path: PathBuf,
    /// Emit JSON log lines.
    pub log_json: bool,
    /// Maximum pet search results for a non-empty query.
    pub search_limit: usize,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        let store_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);
        Self {
            data_dir: PathBuf::from("data"),
            store_path: store_dir.join(STORE_FILE),
            log_json: false,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl CompanionConfig {
    /// Default location of the config file.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Read a TOML config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| CompanionError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CompanionError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// Unparsable numeric values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(store) = lookup(ENV_STORE).filter(|v| !v.is_empty()) {
            self.store_path = PathBuf::from(store);
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            self.log_json = format.eq_ignore_ascii_case("json");
        }
        if let Some(limit) = lookup(ENV_SEARCH_LIMIT).and_then(|v| v.trim().parse().ok()) {
            self.search_limit = limit;
        }
        self
    }

    /// Defaults, then the config file, then the environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var(ENV_CONFIG)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_config_path());
        let config = Self::from_file(&path)?.with_overrides(|key| std::env::var(key).ok());
        tracing::debug!(
            config_path = %path.display(),
            data_dir = %config.data_dir.display(),
            store_path = %config.store_path.display(),
            "configuration resolved"
        );
        Ok(config)
    }
}
