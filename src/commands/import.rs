//! `lg import`: add files to the baseline and rebase the topic branch onto it.
//!
//! All validation happens before the first mutating git command. After that the
//! sequence is stash (if dirty), switch to baseline, commit, switch back,
//! rebase, unstash. A stopped rebase leaves git's own conflict state in place
//! for the user to resolve; the stash is then left for them to pop.

use crate::core::{
    commit_message::import_message,
    context::RepoContext,
    error::{LgError, Result},
    git::{CommitOutcome, GitRepo, StageMode, Vcs},
    marker::is_marker,
    print_info, print_success,
};
use std::collections::BTreeSet;
use std::env;
use std::path::{Component, Path, PathBuf};

const STASH_MESSAGE: &str = "lg import";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Repository-relative paths that were imported
    pub paths: Vec<String>,
    pub message: String,
    /// False when git found nothing to commit
    pub committed: bool,
    /// Whether uncommitted edits were stashed and restored
    pub stashed: bool,
}

pub fn execute_import(paths: Vec<PathBuf>) -> Result<()> {
    let cwd = env::current_dir()?;
    let git_repo = GitRepo::open(&cwd)?;
    let ctx = RepoContext::load(&git_repo)?;

    let summary = import_paths(&ctx, &git_repo, &cwd, &paths)?;

    if summary.committed {
        print_success(&format!(
            "{} (rebased '{}' onto '{}')",
            summary.message,
            ctx.current.as_deref().unwrap_or_default(),
            ctx.baseline
        ));
    } else {
        print_info("Nothing new to commit on the baseline; topic branch rebased");
    }
    if summary.stashed {
        print_info("Uncommitted edits were stashed and restored");
    }
    Ok(())
}

/// Import `args` (relative to `cwd`) into the baseline branch
pub fn import_paths(
    ctx: &RepoContext,
    vcs: &dyn Vcs,
    cwd: &Path,
    args: &[PathBuf],
) -> Result<ImportSummary> {
    let topic = ctx.require_topic()?.to_string();
    let paths = validate_paths(ctx, vcs, cwd, args)?;
    let message = import_message(&paths);

    let stashed = if vcs.has_uncommitted_changes()? {
        log::info!("stashing uncommitted edits on '{topic}'");
        vcs.stash_push(STASH_MESSAGE)?;
        true
    } else {
        false
    };

    if let Err(e) = vcs.checkout(&ctx.baseline) {
        restore_stash(vcs, stashed)?;
        return Err(e);
    }

    let outcome = vcs
        .stage(&paths, StageMode::Force)
        .and_then(|_| vcs.commit(&message, false));
    let committed = match outcome {
        Ok(CommitOutcome::Committed) => true,
        Ok(CommitOutcome::NothingToCommit) => {
            log::warn!("baseline commit had nothing to commit: {message}");
            false
        }
        Err(e) => {
            vcs.checkout(&topic)?;
            restore_stash(vcs, stashed)?;
            return Err(e);
        }
    };

    vcs.checkout(&topic)?;
    if let Err(e) = vcs.rebase(&ctx.baseline) {
        log::debug!("rebase failed: {e}");
        let hint = if stashed {
            "resolve the conflicts, run 'git rebase --continue', then 'git stash pop' to restore your uncommitted edits"
        } else {
            "resolve the conflicts and run 'git rebase --continue'"
        };
        return Err(LgError::RebaseStopped {
            branch: topic,
            onto: ctx.baseline.clone(),
            hint: hint.to_string(),
        });
    }

    restore_stash(vcs, stashed)?;

    Ok(ImportSummary {
        paths,
        message,
        committed,
        stashed,
    })
}

fn restore_stash(vcs: &dyn Vcs, stashed: bool) -> Result<()> {
    if !stashed {
        return Ok(());
    }
    vcs.stash_pop().map_err(|e| LgError::StashRestoreFailed {
        stderr: e.to_string(),
    })
}

/// Resolve every argument to a root-relative path, failing on the first
/// missing, outside, bookkeeping or already-baselined one
fn validate_paths(
    ctx: &RepoContext,
    vcs: &dyn Vcs,
    cwd: &Path,
    args: &[PathBuf],
) -> Result<Vec<String>> {
    if args.is_empty() {
        return Err(LgError::NothingToImport);
    }

    let baselined = vcs.tracked_files(&ctx.baseline)?;
    let mut seen = BTreeSet::new();
    let mut paths = Vec::with_capacity(args.len());

    for arg in args {
        let relative = relative_to_root(&ctx.root, cwd, arg)?;
        if is_marker(&relative) {
            return Err(LgError::MarkerFile { path: arg.clone() });
        }
        if baselined.contains(&relative) {
            return Err(LgError::already_baselined(relative));
        }
        if seen.insert(relative.clone()) {
            paths.push(relative);
        }
    }
    Ok(paths)
}

/// Canonicalize `arg` and express it relative to `root` with `/` separators
fn relative_to_root(root: &Path, cwd: &Path, arg: &Path) -> Result<String> {
    let joined = cwd.join(arg);
    let real = joined
        .canonicalize()
        .map_err(|_| LgError::file_not_found(arg))?;
    if !real.is_file() {
        return Err(LgError::NotAFile {
            path: arg.to_path_buf(),
        });
    }

    let relative = real
        .strip_prefix(root)
        .map_err(|_| LgError::outside_root(&real, root))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or(LgError::InvalidUtf8Path)?),
            _ => return Err(LgError::outside_root(&real, root)),
        }
    }
    if parts.is_empty() {
        return Err(LgError::NotAFile {
            path: arg.to_path_buf(),
        });
    }
    Ok(parts.join("/"))
}
