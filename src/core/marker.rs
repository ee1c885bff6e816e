//! The `.lg` marker file.
//!
//! Written to the working-tree root by `init` and `clone`. It records where the
//! git metadata lives, which lets `clone` accept a working tree or the marker
//! itself as its source. The marker is bookkeeping: it is excluded from git
//! status and never counted among tracked files.

use crate::core::error::{LgError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MARKER_FILE: &str = ".lg";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Marker {
    pub git_dir: PathBuf,
    pub baseline: String,
    pub created_at: DateTime<Utc>,
}

impl Marker {
    pub fn new(git_dir: impl Into<PathBuf>, baseline: impl Into<String>) -> Self {
        Self {
            git_dir: git_dir.into(),
            baseline: baseline.into(),
            created_at: Utc::now(),
        }
    }

    pub fn write(&self, root: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(root.join(MARKER_FILE), content)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| LgError::config_parse(path, e))
    }
}

/// Whether a repository-relative path names the marker
pub fn is_marker(relative: &str) -> bool {
    relative == MARKER_FILE
}
