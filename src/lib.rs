//! lg - private git branches on top of a Perforce workspace.
//!
//! A baseline branch mirrors what the legacy SCM holds; topic branches carry
//! local work and are rebased onto the baseline whenever files are imported.
//! Topic commits are exported back to p4 as a pending changelist.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module, which provides:
//! - Git operations behind the [`Vcs`] capability trait
//! - Unified-diff translation into [`FileChange`] records
//! - The p4 export bridge
//! - Error handling and result types
//!
//! The workflow operations themselves live in [`commands`].

pub mod commands;
pub mod core;

// Re-export the core public API for external users
pub use core::{
    export_commands,
    translate,
    ChangeKind,
    CommitOutcome,
    FileChange,
    // Git operations
    GitRepo,
    LegacyScm,
    // Error handling
    LgError,
    Marker,
    P4Client,
    P4Command,
    P4Op,
    RepoContext,
    Result,
    // Configuration
    Settings,
    StageMode,
    TranslateMode,
    Vcs,
};
