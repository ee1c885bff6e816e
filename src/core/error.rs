//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`LgError`] which covers every failure mode of the lg
//! workflow. It uses `thiserror` for ergonomic error definitions and includes
//! constructors for the common failure scenarios.
//!
//! # Public API
//! - [`LgError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, LgError>`
//!
//! # Error Categories
//! - **Preconditions**: wrong branch, missing or duplicate files, missing clone source.
//!   Always raised before the first mutating command.
//! - **Mid-operation**: git command failures, stopped rebases, stash restore failures
//! - **Export**: accumulated p4 command failures
//! - **Environment**: p4 binary missing, no client root, unreadable configuration

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for lg
#[derive(Error, Debug)]
pub enum LgError {
    // Repository errors
    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("Not an lg repository: no '{baseline}' or '{legacy}' branch found")]
    NotAnLgRepository { baseline: String, legacy: String },

    #[error("Repository metadata already exists at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Git repository error: {0}")]
    GitRepo(#[from] git2::Error),

    #[error("Invalid UTF-8 path in repository")]
    InvalidUtf8Path,

    #[error("git {command} failed: {stderr}")]
    GitCommandFailed { command: String, stderr: String },

    // Branch preconditions
    #[error("Current branch is the baseline branch '{baseline}'; switch to a topic branch first")]
    OnBaselineBranch { baseline: String },

    #[error("sync must be run on the baseline branch '{baseline}' (currently on '{current}')")]
    NotOnBaselineBranch { baseline: String, current: String },

    #[error("HEAD is detached; check out a topic branch first")]
    DetachedHead,

    #[error("'{name}' is reserved for the baseline branch; choose another topic name")]
    ReservedBranchName { name: String },

    // Import preconditions
    #[error("File does not exist: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("{path} is outside repository {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{path} is lg bookkeeping and cannot be imported")]
    MarkerFile { path: PathBuf },

    #[error("{path} is already baselined")]
    AlreadyBaselined { path: String },

    #[error("No files given to import")]
    NothingToImport,

    // Mid-operation failures
    #[error("Rebase of '{branch}' onto '{onto}' stopped: {hint}")]
    RebaseStopped {
        branch: String,
        onto: String,
        hint: String,
    },

    #[error("Failed to restore stashed changes ({stderr}); run 'git stash pop' by hand")]
    StashRestoreFailed { stderr: String },

    // Clone
    #[error("Clone source does not exist: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("Clone source is not git metadata or an lg pointer: {path}")]
    InvalidSource { path: PathBuf },

    // Diff translation
    #[error("Unrecognized diff output at line {line}: {message}")]
    DiffParse { line: usize, message: String },

    // Export
    #[error("p4 binary not found: {binary}")]
    P4NotFound { binary: PathBuf },

    #[error("p4 reports no client root; check P4CLIENT and 'p4 info'")]
    NoClientRoot,

    #[error("{root} is not under the p4 client root {client_root}")]
    OutsideClientRoot { root: PathBuf, client_root: PathBuf },

    #[error("p4 {command} failed: {message}")]
    P4CommandFailed { command: String, message: String },

    #[error("{} p4 command(s) failed", failed.len())]
    ExportFailed { failed: Vec<String> },

    // Configuration and I/O
    #[error("Failed to parse {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using LgError
pub type Result<T> = std::result::Result<T, LgError>;

impl LgError {
    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an outside-root error
    pub fn outside_root(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutsideRoot {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Create an already-baselined error
    pub fn already_baselined(path: impl Into<String>) -> Self {
        Self::AlreadyBaselined { path: path.into() }
    }

    /// Create a git command failure from the argument list and captured stderr
    pub fn git_command_failed(args: &[&str], stderr: impl AsRef<str>) -> Self {
        Self::GitCommandFailed {
            command: args.join(" "),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }

    /// Create a diff parse error
    pub fn diff_parse(line: usize, message: impl Into<String>) -> Self {
        Self::DiffParse {
            line,
            message: message.into(),
        }
    }

    /// Create a config parse error
    pub fn config_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }
}
