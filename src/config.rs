//! Configuration loader plus strongly typed settings structures.
//!
//! Settings live in `~/.filter-table/config.toml` (or `$FILTER_TABLE_DIR`).
//! The embedded default is written there on first run; every field falls back
//! to its default when missing from the file.

use crate::core::dropdown::DropdownOptions;
use crate::core::search::{FuzzyMatcher, DEFAULT_THRESHOLD};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// Embed default configuration at compile time
const DEFAULT_CONFIG: &str = include_str!("../defaults/config.toml");

/// Environment variable overriding the config directory
pub const DIR_ENV_VAR: &str = "FILTER_TABLE_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_search_enabled")]
    pub search_enabled: bool,
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64, // Event poll timeout in milliseconds (lower = higher FPS, higher CPU)
    #[serde(default = "default_max_list_height")]
    pub max_list_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_enabled: default_search_enabled(),
            poll_timeout_ms: default_poll_timeout_ms(),
            max_list_height: default_max_list_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset file; the built-in rows are used when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_search_enabled() -> bool {
    true
}

fn default_poll_timeout_ms() -> u64 {
    16 // 16ms = ~60 FPS
}

fn default_max_list_height() -> u16 {
    12
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Config {
    /// Load from the config directory, writing the default file if missing
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&Self::config_dir()?)
    }

    /// Load `config.toml` from `dir`, creating it from the embedded default first
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::extract_defaults(dir)?;
        Self::load_from_path(&dir.join("config.toml"))
    }

    /// Load config from a custom file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .context(format!("Failed to parse config file: {:?}", path))?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Embedded defaults, parsed without touching disk
    pub fn embedded_default() -> Result<Self> {
        toml::from_str(DEFAULT_CONFIG).context("Failed to parse embedded default config")
    }

    fn extract_defaults(dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).context(format!("Failed to create {:?}", dir))?;
        let config_path = dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG).context("Failed to write config.toml")?;
            tracing::info!("Extracted default config to {:?}", config_path);
        }
        Ok(())
    }

    /// Get the base directory (~/.filter-table/)
    /// Can be overridden with the FILTER_TABLE_DIR environment variable
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(custom_dir) = std::env::var(DIR_ENV_VAR) {
            return Ok(PathBuf::from(custom_dir));
        }

        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".filter-table"))
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.ui.poll_timeout_ms.max(1))
    }

    /// Dropdown settings derived from `[ui]` and `[search]`
    pub fn dropdown_options(&self) -> DropdownOptions {
        DropdownOptions {
            search_enabled: self.ui.search_enabled,
            matcher: FuzzyMatcher::new(self.search.threshold),
        }
    }
}
