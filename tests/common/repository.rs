//! Workspace management and setup utilities
//!
//! Provides functions for creating temporary workspaces, running the `lg`
//! binary inside them, and inspecting the resulting git state.

#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::prelude::*;
use lg::core::error::{LgError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary workspace. Both TempDirs must be kept alive for the duration
/// of the test to prevent cleanup.
pub struct TestRepo {
    pub temp_dir: TempDir,
    /// Isolated XDG config home so a developer's lg config never leaks in
    pub config_dir: TempDir,
    pub path: PathBuf,
}

impl TestRepo {
    /// Get the workspace path as a reference
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `lg` command running in this workspace
    pub fn lg(&self) -> Command {
        self.lg_in(&self.path)
    }

    /// `lg` command running in `dir` with this workspace's isolated environment
    pub fn lg_in(&self, dir: &Path) -> Command {
        let mut cmd = Command::new(cargo_bin("lg"));
        isolate(&mut cmd, self.config_dir.path());
        cmd.current_dir(dir);
        cmd
    }

    /// Run git in the workspace and return stdout, failing on a non-zero exit
    pub fn git(&self, args: &[&str]) -> Result<String> {
        git_in(&self.path, self.config_dir.path(), args)
    }

    pub fn current_branch(&self) -> Result<String> {
        Ok(self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?.trim().to_string())
    }

    /// Subjects of the commits reachable from `rev`, newest first
    pub fn subjects(&self, rev: &str) -> Result<Vec<String>> {
        Ok(self
            .git(&["log", "--format=%s", rev])?
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Paths touched by the commit `rev`
    pub fn touched(&self, rev: &str) -> Result<Vec<String>> {
        Ok(self
            .git(&["show", "--name-only", "--format=", rev])?
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// Pin git identity and config so tests behave the same on every machine
fn isolate(cmd: &mut Command, config_home: &Path) {
    cmd.env("GIT_AUTHOR_NAME", "Test User")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test User")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("NO_COLOR", "1")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("LG_REMOTE_DIR")
        .env_remove("LG_P4");
}

fn git_in(dir: &Path, config_home: &Path, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("git");
    isolate(&mut cmd, config_home);
    let output = cmd.args(args).current_dir(dir).output()?;
    if !output.status.success() {
        return Err(LgError::git_command_failed(
            args,
            String::from_utf8_lossy(&output.stderr),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Sets up an empty workspace directory with no git metadata
pub fn setup_workspace() -> Result<TestRepo> {
    let temp_dir = TempDir::new()?;
    let config_dir = TempDir::new()?;
    let path = temp_dir.path().canonicalize()?;
    Ok(TestRepo {
        temp_dir,
        config_dir,
        path,
    })
}

/// Sets up a plain git repository without lg branches
pub fn setup_plain_git_repo() -> Result<TestRepo> {
    let repo = setup_workspace()?;
    repo.git(&["init", "-q"])?;
    Ok(repo)
}

/// Sets up a workspace initialized by `lg init`, on topic branch `work`
pub fn setup_lg_repo() -> Result<TestRepo> {
    let repo = setup_workspace()?;
    repo.lg().arg("init").assert().success();
    Ok(repo)
}

/// Creates a file with specified content, creating parent directories
pub fn create_file(repo_path: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo_path.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Removes a file from the filesystem (not from git)
pub fn remove_file(repo_path: &Path, filename: &str) -> Result<()> {
    fs::remove_file(repo_path.join(filename))?;
    Ok(())
}

/// Creates multiple test files with distinct content
pub fn create_test_files(repo_path: &Path, filenames: &[&str]) -> Result<()> {
    for (i, filename) in filenames.iter().enumerate() {
        let content = format!("content{}\nline 2\nline 3\n", i + 1);
        create_file(repo_path, filename, &content)?;
    }
    Ok(())
}

/// Writes an executable stand-in for `p4` into `dir` and returns its path.
///
/// `p4 info` reports `client_root`. Every invocation is appended to
/// `dir/p4.log`. The command whose arguments equal `reject` (for example
/// `edit d`) is refused the way p4 does in `-s` mode: an `error:` line and a
/// zero exit status.
#[cfg(unix)]
pub fn create_fake_p4(dir: &Path, client_root: &Path, reject: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
echo "$*" >> "{log}"
if [ "$1" = "info" ]; then
  echo "User name: tester"
  echo "Client root: {root}"
  exit 0
fi
shift
if [ "$*" = "{reject}" ]; then
  echo "error: $2 - file(s) not on client."
  echo "exit: 1"
  exit 0
fi
echo "info: $* - opened"
echo "exit: 0"
"#,
        log = dir.join("p4.log").display(),
        root = client_root.display(),
        reject = reject,
    );
    let path = dir.join("p4");
    fs::write(&path, script)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}
