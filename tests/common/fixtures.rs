//! Predefined repository scenarios
//!
//! Provides functions for creating lg workspaces with specific baseline and
//! topic states to test the workflow consistently.

#![allow(dead_code)]

use super::repository::*;
use assert_cmd::prelude::*;
use lg::core::error::Result;

/// Scenario: lg workspace whose baseline tracks `files`, topic rebased onto it
pub fn lg_repo_with_baseline(files: &[&str]) -> Result<TestRepo> {
    let repo = setup_lg_repo()?;
    create_test_files(&repo.path, files)?;
    repo.lg().arg("import").args(files).assert().success();
    Ok(repo)
}

/// Scenario: baseline tracks d and e; the topic renames d→x and e→subdir/e
pub fn lg_repo_with_renames() -> Result<TestRepo> {
    let repo = lg_repo_with_baseline(&["d", "e"])?;
    std::fs::create_dir_all(repo.path.join("subdir"))?;
    repo.git(&["mv", "d", "x"])?;
    repo.git(&["mv", "e", "subdir/e"])?;
    repo.git(&["commit", "-q", "-m", "Rename d and e"])?;
    Ok(repo)
}
