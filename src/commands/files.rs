use crate::core::{
    context::RepoContext,
    diff_parser::translate,
    error::Result,
    file_change::{FileChange, TranslateMode},
    git::{GitRepo, Vcs},
};
use std::env;

pub fn execute_files(range: Option<String>) -> Result<()> {
    let git_repo = GitRepo::open(env::current_dir()?)?;
    let ctx = RepoContext::load(&git_repo)?;

    for change in list_files(&ctx, &git_repo, range.as_deref())? {
        println!("{change}");
    }
    Ok(())
}

/// Files changed on the topic branch since it diverged from the baseline
pub fn list_files(ctx: &RepoContext, vcs: &dyn Vcs, range: Option<&str>) -> Result<Vec<FileChange>> {
    ctx.require_topic()?;
    let range = range
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}...HEAD", ctx.baseline));
    let diff = vcs.diff(&range)?;
    translate(&diff, TranslateMode::Status)
}
