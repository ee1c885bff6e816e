use crate::core::{
    context::RepoContext,
    error::Result,
    git::{GitRepo, Vcs},
    print_raw,
};
use std::env;

pub fn execute_log(range: Option<String>) -> Result<()> {
    let git_repo = GitRepo::open(env::current_dir()?)?;
    let ctx = RepoContext::load(&git_repo)?;

    print_raw(&topic_log(&ctx, &git_repo, range.as_deref())?);
    Ok(())
}

/// `git log` of the commits the topic branch has on top of the baseline
pub fn topic_log(ctx: &RepoContext, vcs: &dyn Vcs, range: Option<&str>) -> Result<String> {
    ctx.require_topic()?;
    let range = range
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}..HEAD", ctx.baseline));
    vcs.log(&range)
}
