use crate::core::{
    error::Result,
    git::{GitRepo, Vcs},
    print_raw,
};
use std::env;

/// Works in any git repository, lg branches or not
pub fn execute_status() -> Result<()> {
    let git_repo = GitRepo::open(env::current_dir()?)?;
    print_raw(&working_tree_status(&git_repo)?);
    Ok(())
}

pub fn working_tree_status(vcs: &dyn Vcs) -> Result<String> {
    vcs.status()
}
