use crate::core::{
    config::Settings,
    context::{validate_topic_name, BASELINE_BRANCH},
    dirs::metadata_directory,
    error::{LgError, Result},
    git::{GitRepo, Vcs},
    marker::{Marker, MARKER_FILE},
    print_info, print_success,
};
use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Message of the placeholder commit every baseline starts with
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial baseline";

pub fn execute_init(name: Option<String>, remote_dir: Option<PathBuf>) -> Result<()> {
    let settings = Settings::resolve(remote_dir)?;
    let topic = name.unwrap_or(settings.default_topic);
    validate_topic_name(&topic)?;

    let root = env::current_dir()?.canonicalize()?;
    let git_repo = create_store(&root, settings.remote_dir.as_deref())?;
    init_branches(&git_repo, &topic)?;

    print_success(&format!(
        "Initialized lg repository in {} (baseline '{}', topic '{}')",
        root.display(),
        BASELINE_BRANCH,
        topic
    ));
    if settings.remote_dir.is_some() {
        print_info(&format!("Metadata stored in {}", git_repo.git_dir().display()));
    }
    Ok(())
}

/// Fail unless `root` is free of git and lg metadata
pub fn ensure_no_metadata(root: &Path) -> Result<()> {
    for entry in [".git", MARKER_FILE] {
        let path = root.join(entry);
        if path.exists() {
            return Err(LgError::AlreadyInitialized { path });
        }
    }
    Ok(())
}

/// Create the git store for `root`, shared by `init` and `clone`.
///
/// Leaves HEAD on the unborn baseline branch with the marker written and
/// excluded from status.
pub fn create_store(root: &Path, remote_dir: Option<&Path>) -> Result<GitRepo> {
    ensure_no_metadata(root)?;

    let git_dir = remote_dir.map(|prefix| metadata_directory(prefix, root));
    if let Some(dir) = &git_dir {
        if dir.exists() {
            return Err(LgError::AlreadyInitialized { path: dir.clone() });
        }
        if let Some(parent) = dir.parent() {
            fs::create_dir_all(parent)?;
        }
        log::debug!("storing metadata out of tree at {}", dir.display());
    }

    let git_repo = GitRepo::init_store(root, BASELINE_BRANCH, git_dir.as_deref())?;
    git_repo.set_config("status.showUntrackedFiles", "no")?;
    exclude_marker(&git_repo.git_dir())?;
    Marker::new(git_repo.git_dir(), BASELINE_BRANCH).write(root)?;
    Ok(git_repo)
}

/// Placeholder baseline commit, then switch to a fresh topic branch.
///
/// The placeholder gives the first import's rebase an ancestry to work with.
pub fn init_branches(vcs: &dyn Vcs, topic: &str) -> Result<()> {
    vcs.commit(INITIAL_COMMIT_MESSAGE, true)?;
    vcs.create_branch(topic)?;
    log::info!("created baseline and topic branch '{topic}'");
    Ok(())
}

fn exclude_marker(git_dir: &Path) -> Result<()> {
    let info_dir = git_dir.join("info");
    fs::create_dir_all(&info_dir)?;
    let mut exclude = OpenOptions::new()
        .create(true)
        .append(true)
        .open(info_dir.join("exclude"))?;
    writeln!(exclude, "/{MARKER_FILE}")?;
    Ok(())
}
