//! `lg clone`: bootstrap a working tree from existing lg metadata.
//!
//! The source may be the metadata directory itself, a working tree that has
//! one, or a pointer to one (the `.lg` marker or git's own `gitdir:` file).
//! The local working tree is adopted as-is; only the index is rebuilt.

use crate::commands::init::{create_store, ensure_no_metadata};
use crate::core::{
    config::Settings,
    context::{validate_topic_name, BASELINE_BRANCH, LEGACY_BASELINE_BRANCH},
    error::{LgError, Result},
    git::Vcs,
    marker::{Marker, MARKER_FILE},
    print_info, print_success,
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const ORIGIN: &str = "origin";
const GITDIR_PREFIX: &str = "gitdir:";

pub fn execute_clone(source: PathBuf, name: Option<String>, remote_dir: Option<PathBuf>) -> Result<()> {
    let settings = Settings::resolve(remote_dir)?;
    let topic = name.unwrap_or(settings.default_topic);
    validate_topic_name(&topic)?;

    let root = env::current_dir()?.canonicalize()?;
    ensure_no_metadata(&root)?;
    let source_dir = resolve_source(&source)?;
    log::info!("cloning from metadata at {}", source_dir.display());

    let git_repo = create_store(&root, settings.remote_dir.as_deref())?;
    let baseline = clone_from(&git_repo, &source_dir, &topic)?;

    print_success(&format!(
        "Cloned '{baseline}' from {} into {} (topic '{topic}')",
        source_dir.display(),
        root.display()
    ));
    print_info("Local files that differ from the baseline show up as unstaged edits");
    Ok(())
}

/// Fetch `source` into a fresh store and point the baseline at its tip.
///
/// Returns the name of the source's baseline branch.
pub fn clone_from(vcs: &dyn Vcs, source: &Path, topic: &str) -> Result<String> {
    vcs.add_remote(ORIGIN, source)?;
    vcs.fetch(ORIGIN)?;

    let remote = vcs.remote_branches(ORIGIN)?;
    let baseline = [BASELINE_BRANCH, LEGACY_BASELINE_BRANCH]
        .into_iter()
        .find(|name| remote.iter().any(|branch| branch == name))
        .ok_or_else(|| LgError::NotAnLgRepository {
            baseline: BASELINE_BRANCH.to_string(),
            legacy: LEGACY_BASELINE_BRANCH.to_string(),
        })?;

    vcs.reset_soft(&format!("{ORIGIN}/{baseline}"))?;
    // a fresh store has an empty index; rebuild it so the tree is not all deletions
    vcs.reset_index()?;
    vcs.create_branch(topic)?;
    Ok(baseline.to_string())
}

/// Find the git metadata directory `source` refers to
pub fn resolve_source(source: &Path) -> Result<PathBuf> {
    if !source.exists() {
        return Err(LgError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }
    let source = source.canonicalize()?;

    if source.is_dir() {
        if is_metadata_dir(&source) {
            return Ok(source);
        }
        for entry in [".git", MARKER_FILE] {
            let candidate = source.join(entry);
            if candidate.is_dir() && is_metadata_dir(&candidate) {
                return Ok(candidate);
            }
            if candidate.is_file() {
                return follow_pointer(&candidate);
            }
        }
        return Err(LgError::InvalidSource { path: source });
    }
    follow_pointer(&source)
}

fn is_metadata_dir(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir()
}

/// Read a `gitdir:` file or an lg marker and return the directory it names
fn follow_pointer(file: &Path) -> Result<PathBuf> {
    let invalid = || LgError::InvalidSource {
        path: file.to_path_buf(),
    };

    let content = fs::read_to_string(file).map_err(|_| invalid())?;
    let target = match content.trim_start().strip_prefix(GITDIR_PREFIX) {
        Some(rest) => PathBuf::from(rest.trim()),
        None => Marker::read(file).map_err(|_| invalid())?.git_dir,
    };

    let target = if target.is_relative() {
        file.parent().map(|dir| dir.join(&target)).unwrap_or(target)
    } else {
        target
    };
    log::debug!("{} points at {}", file.display(), target.display());

    if !is_metadata_dir(&target) {
        return Err(invalid());
    }
    Ok(target.canonicalize()?)
}
