//! Normalized file-level change records.
//!
//! [`FileChange`] is what the diff translator produces and what both the `files`
//! listing and the p4 export consume. It replaces raw diff text with a small sum
//! type so consumers never have to re-parse git output.
//!
//! # Public API
//! - [`FileChange`]: one path plus the kind of change applied to it
//! - [`ChangeKind`]: add, edit, delete or move
//! - [`TranslateMode`]: the granularity requested from the translator

use std::fmt;

/// What happened to a path between two revisions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// New file
    Add,
    /// Content or mode change
    Edit,
    /// File removed
    Delete,
    /// File moved here from `from`
    Move { from: String },
}

impl ChangeKind {
    /// Verb used in listings and as the p4 operation name
    pub fn verb(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Edit => "edit",
            ChangeKind::Delete => "delete",
            ChangeKind::Move { .. } => "move",
        }
    }
}

/// A single normalized change. For moves `path` is the destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn add(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Add,
        }
    }

    pub fn edit(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Edit,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Delete,
        }
    }

    pub fn moved(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: to.into(),
            kind: ChangeKind::Move { from: from.into() },
        }
    }
}

impl fmt::Display for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ChangeKind::Move { from } => write!(f, "move {} {}", from, self.path),
            kind => write!(f, "{} {}", kind.verb(), self.path),
        }
    }
}

/// Granularity requested from the diff translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateMode {
    /// One record per touched path; a rename is an edit of the new path
    Status,
    /// Renames become an edit of the old path followed by a move
    Export,
}
