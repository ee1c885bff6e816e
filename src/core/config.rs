//! Settings resolution.
//!
//! Each setting comes from, in order of precedence: a command-line flag, an
//! environment variable, the user config file (`<config dir>/lg/config.json`),
//! and finally a built-in default.

use crate::core::dirs::get_config_directory;
use crate::core::error::{LgError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory prefix under which git metadata is kept out of tree
pub const REMOTE_DIR_ENV: &str = "LG_REMOTE_DIR";
/// Path or name of the p4 client binary
pub const P4_BINARY_ENV: &str = "LG_P4";

pub const DEFAULT_P4_BINARY: &str = "p4";
pub const DEFAULT_TOPIC: &str = "work";

/// Contents of the optional user config file
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    pub remote_dir: Option<PathBuf>,
    pub p4_binary: Option<PathBuf>,
    pub default_topic: Option<String>,
}

impl UserConfig {
    /// Load from the user config directory; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let config_file = get_config_directory()?.join("config.json");
        Self::load_from(&config_file)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config file at {}", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| LgError::config_parse(path, e))
    }
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub remote_dir: Option<PathBuf>,
    pub p4_binary: PathBuf,
    pub default_topic: String,
}

impl Settings {
    /// Resolve from the real environment and config file
    pub fn resolve(cli_remote_dir: Option<PathBuf>) -> Result<Self> {
        let file = UserConfig::load()?;
        Ok(Self::from_sources(cli_remote_dir, |key| std::env::var(key).ok(), file))
    }

    pub fn from_sources<F>(cli_remote_dir: Option<PathBuf>, env: F, file: UserConfig) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|value| !value.is_empty());

        let remote_dir = cli_remote_dir
            .or_else(|| non_empty(REMOTE_DIR_ENV).map(PathBuf::from))
            .or(file.remote_dir);
        let p4_binary = non_empty(P4_BINARY_ENV)
            .map(PathBuf::from)
            .or(file.p4_binary)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_P4_BINARY));
        let default_topic = file
            .default_topic
            .unwrap_or_else(|| DEFAULT_TOPIC.to_string());

        Settings {
            remote_dir,
            p4_binary,
            default_topic,
        }
    }
}
