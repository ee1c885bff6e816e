use crate::core::{
    context::RepoContext,
    error::Result,
    git::{CommitOutcome, GitRepo, StageMode, Vcs},
    marker::is_marker,
    print_info, print_success,
};
use std::env;

pub const DEFAULT_SYNC_MESSAGE: &str = "Sync from p4";

/// Paths per `git add` invocation, keeps argv well under system limits
const STAGE_CHUNK: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// One baseline commit covering the given number of tracked files
    Committed { files: usize },
    /// Tracked files already matched the baseline tip
    Unchanged,
}

pub fn execute_sync(message: Option<String>) -> Result<()> {
    let git_repo = GitRepo::open(env::current_dir()?)?;
    let ctx = RepoContext::load(&git_repo)?;

    match sync_baseline(&ctx, &git_repo, message.as_deref())? {
        SyncOutcome::Committed { files } => print_success(&format!(
            "Synced '{}' ({files} tracked file(s) checked)",
            ctx.baseline
        )),
        SyncOutcome::Unchanged => print_info(&format!("'{}' is already up to date", ctx.baseline)),
    }
    Ok(())
}

/// Commit the working-tree state of every baseline-tracked file.
///
/// Only paths already in the baseline tip are staged, so files the legacy SCM
/// knows nothing about never leak in. Deletions are staged too.
pub fn sync_baseline(ctx: &RepoContext, vcs: &dyn Vcs, message: Option<&str>) -> Result<SyncOutcome> {
    ctx.require_baseline()?;

    let tracked: Vec<String> = vcs
        .tracked_files(&ctx.baseline)?
        .into_iter()
        .filter(|path| !is_marker(path))
        .collect();
    log::debug!("sync: {} tracked file(s) in '{}'", tracked.len(), ctx.baseline);

    for chunk in tracked.chunks(STAGE_CHUNK) {
        vcs.stage(chunk, StageMode::TrackedOnly)?;
    }

    let message = message.unwrap_or(DEFAULT_SYNC_MESSAGE);
    match vcs.commit(message, false)? {
        CommitOutcome::Committed => Ok(SyncOutcome::Committed {
            files: tracked.len(),
        }),
        CommitOutcome::NothingToCommit => {
            log::info!("sync found nothing to commit");
            Ok(SyncOutcome::Unchanged)
        }
    }
}
