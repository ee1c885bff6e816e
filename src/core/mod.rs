//! Core functionality for lg.
//!
//! This module provides the building blocks the commands are assembled from:
//! the git adapter, the diff translator, the p4 bridge, configuration and
//! output helpers.

pub mod commit_message;
pub mod config;
pub mod context;
pub mod diff_parser;
pub mod dirs;
pub mod error;
pub mod file_change;
pub mod git;
pub mod marker;
pub mod output;
pub mod p4;

#[cfg(test)]
pub mod testing;

// === Error handling ===
pub use error::{LgError, Result};

// === Git operations ===
// Capability trait plus the live git2/CLI implementation
pub use git::{CommitOutcome, GitRepo, StageMode, Vcs};

// === Repository context ===
pub use context::{RepoContext, BASELINE_BRANCH, LEGACY_BASELINE_BRANCH};

// === Diff translation ===
pub use diff_parser::translate;
pub use file_change::{ChangeKind, FileChange, TranslateMode};

// === Perforce bridge ===
pub use p4::{export_commands, LegacyScm, P4Client, P4Command, P4Op};

// === Configuration ===
pub use config::{Settings, UserConfig};
pub use marker::{Marker, MARKER_FILE};

// === Output formatting ===
pub use output::{print_error, print_info, print_raw, print_success};
