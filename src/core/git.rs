//! Git adapter: the [`Vcs`] capability trait and its live implementation.
//!
//! The workflow engine only talks to git through [`Vcs`], so it can be driven by
//! an in-memory fake in tests. [`GitRepo`] is the real thing: reads (branches,
//! trees, status) go through `git2`, mutations (commit, rebase, stash, fetch)
//! shell out to the `git` CLI so they honour hooks, config and locking exactly
//! as a user's own git invocation would.
//!
//! # Public API
//! - [`Vcs`]: branch / commit / diff / stash / remote capabilities
//! - [`GitRepo`]: `git2` + `git` CLI implementation
//! - [`CommitOutcome`], [`StageMode`]: small result and option types

use crate::core::error::{LgError, Result};
use git2::{BranchType, ErrorCode, ObjectType, Repository, StatusOptions, TreeWalkMode, TreeWalkResult};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a commit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// git refused because the index matched HEAD
    NothingToCommit,
}

/// How paths are staged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMode {
    /// `git add -f`: stage new paths even if ignored
    Force,
    /// `git add -u`: only paths git already tracks, deletions included
    TrackedOnly,
}

/// Version-control primitives the workflow engine is built from.
///
/// Paths are repository-relative with `/` separators. Ranges and revisions are
/// passed through to git unchanged.
pub trait Vcs {
    /// Root of the working tree
    fn workdir(&self) -> &Path;

    /// Checked-out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    fn local_branches(&self) -> Result<Vec<String>>;

    /// Branch names under `remote`, without the `<remote>/` prefix
    fn remote_branches(&self, remote: &str) -> Result<Vec<String>>;

    fn checkout(&self, branch: &str) -> Result<()>;

    /// Create `branch` at HEAD and switch to it
    fn create_branch(&self, branch: &str) -> Result<()>;

    /// Every blob path in the tree of `rev`
    fn tracked_files(&self, rev: &str) -> Result<BTreeSet<String>>;

    /// Whether tracked files differ from HEAD in the index or working tree
    fn has_uncommitted_changes(&self) -> Result<bool>;

    fn stage(&self, paths: &[String], mode: StageMode) -> Result<()>;

    fn commit(&self, message: &str, allow_empty: bool) -> Result<CommitOutcome>;

    /// Rebase the current branch onto `onto`
    fn rebase(&self, onto: &str) -> Result<()>;

    fn stash_push(&self, message: &str) -> Result<()>;

    fn stash_pop(&self) -> Result<()>;

    fn stash_len(&self) -> Result<usize>;

    /// Unified diff for `range`, rename detection on, `a/`/`b/` prefixes
    fn diff(&self, range: &str) -> Result<String>;

    fn log(&self, range: &str) -> Result<String>;

    /// Human-readable status with untracked files hidden
    fn status(&self) -> Result<String>;

    fn add_remote(&self, name: &str, url: &Path) -> Result<()>;

    fn fetch(&self, remote: &str) -> Result<()>;

    /// Move the current branch to `rev` leaving index and tree alone
    fn reset_soft(&self, rev: &str) -> Result<()>;

    /// Reset the index to HEAD leaving the working tree alone
    fn reset_index(&self) -> Result<()>;
}

pub struct GitRepo {
    repo: Repository,
    workdir: PathBuf,
}

impl GitRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| LgError::NotInGitRepo)?;
        // libgit2 places the workdir next to the metadata when it is reached
        // through a `gitdir:` file, so prefer the directory holding that file
        let workdir = match gitlink_root(path) {
            Some(root) => root,
            None => repo.workdir().ok_or(LgError::NotInGitRepo)?.to_path_buf(),
        };
        Ok(GitRepo { repo, workdir })
    }

    /// Create a new git store for `root` whose unborn HEAD is `baseline`.
    ///
    /// With `git_dir` the metadata lives there and `root/.git` becomes a
    /// `gitdir:` pointer file.
    pub fn init_store(root: &Path, baseline: &str, git_dir: Option<&Path>) -> Result<Self> {
        let mut cmd = Command::new("git");
        cmd.args(["init", "-q"]);
        if let Some(dir) = git_dir {
            cmd.arg("--separate-git-dir").arg(dir);
        }
        cmd.arg(root);
        log::debug!("running {cmd:?}");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(LgError::git_command_failed(
                &["init"],
                String::from_utf8_lossy(&output.stderr),
            ));
        }

        if let Some(dir) = git_dir {
            let worktree = root.canonicalize()?;
            let worktree = worktree.to_str().ok_or(LgError::InvalidUtf8Path)?;
            Repository::open(dir)?
                .config()?
                .set_str("core.worktree", worktree)?;
        }

        let git_repo = GitRepo::open(root)?;
        git_repo
            .repo
            .set_head(&format!("refs/heads/{baseline}"))?;
        Ok(git_repo)
    }

    /// The metadata directory (`.git` or the out-of-tree location)
    pub fn git_dir(&self) -> PathBuf {
        self.repo.path().to_path_buf()
    }

    pub fn set_config(&self, key: &str, value: &str) -> Result<()> {
        self.repo.config()?.set_str(key, value)?;
        Ok(())
    }

    fn git_output(&self, args: &[&str]) -> Result<Output> {
        log::debug!("git {}", args.join(" "));
        // paths handed to git are file names, never pathspec magic or globs
        let output = Command::new("git")
            .args(args)
            .env("GIT_LITERAL_PATHSPECS", "1")
            .current_dir(&self.workdir)
            .output()?;
        Ok(output)
    }

    /// Execute a git command in the working tree, returning stdout
    fn run_git(&self, args: &[&str]) -> Result<String> {
        let output = self.git_output(args)?;
        if !output.status.success() {
            return Err(LgError::git_command_failed(
                args,
                String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Nearest directory at or above `start` whose `.git` is a pointer file
fn gitlink_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    for dir in start.ancestors() {
        let dot_git = dir.join(".git");
        if dot_git.is_file() {
            return Some(dir.to_path_buf());
        }
        if dot_git.is_dir() {
            return None;
        }
    }
    None
}

impl Vcs for GitRepo {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn current_branch(&self) -> Result<Option<String>> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
            Ok(_) => Ok(None),
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = self.repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(str::to_string))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn local_branches(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let name = branch.name()?.ok_or(LgError::InvalidUtf8Path)?;
            names.push(name.to_string());
        }
        names.sort();
        Ok(names)
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let prefix = format!("{remote}/");
        let mut names = Vec::new();
        for branch in self.repo.branches(Some(BranchType::Remote))? {
            let (branch, _) = branch?;
            if let Some(name) = branch.name()?.and_then(|n| n.strip_prefix(&prefix)) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run_git(&["checkout", "-q", branch]).map(|_| ())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.run_git(&["checkout", "-q", "-b", branch]).map(|_| ())
    }

    fn tracked_files(&self, rev: &str) -> Result<BTreeSet<String>> {
        let tree = self.repo.revparse_single(rev)?.peel_to_tree()?;
        let mut files = BTreeSet::new();
        tree.walk(TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                let name = String::from_utf8_lossy(entry.name_bytes());
                files.insert(format!("{dir}{name}"));
            }
            TreeWalkResult::Ok
        })?;
        Ok(files)
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false);
        opts.include_ignored(false);
        opts.exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        Ok(statuses
            .iter()
            .any(|entry| entry.status() != git2::Status::CURRENT))
    }

    fn stage(&self, paths: &[String], mode: StageMode) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add"];
        args.push(match mode {
            StageMode::Force => "-f",
            StageMode::TrackedOnly => "-u",
        });
        args.push("--");
        args.extend(paths.iter().map(String::as_str));
        self.run_git(&args).map(|_| ())
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<CommitOutcome> {
        let mut args = vec!["commit", "-m", message];
        if allow_empty {
            args.push("--allow-empty");
        }
        let output = self.git_output(&args)?;
        if output.status.success() {
            return Ok(CommitOutcome::Committed);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let nothing = ["nothing to commit", "nothing added to commit", "no changes added to commit"];
        if nothing
            .iter()
            .any(|marker| stdout.contains(marker) || stderr.contains(marker))
        {
            return Ok(CommitOutcome::NothingToCommit);
        }
        Err(LgError::git_command_failed(&["commit"], stderr))
    }

    fn rebase(&self, onto: &str) -> Result<()> {
        let output = self.git_output(&["rebase", onto])?;
        if output.status.success() {
            return Ok(());
        }
        // conflicts are reported on stdout, setup failures on stderr
        let mut detail = String::from_utf8_lossy(&output.stderr).into_owned();
        detail.push_str(&String::from_utf8_lossy(&output.stdout));
        Err(LgError::git_command_failed(&["rebase", onto], detail))
    }

    fn stash_push(&self, message: &str) -> Result<()> {
        self.run_git(&["stash", "push", "-q", "-m", message]).map(|_| ())
    }

    fn stash_pop(&self) -> Result<()> {
        if self.run_git(&["stash", "pop", "-q", "--index"]).is_ok() {
            return Ok(());
        }
        log::warn!("stash pop --index failed, retrying without restoring the index");
        self.run_git(&["stash", "pop", "-q"]).map(|_| ())
    }

    fn stash_len(&self) -> Result<usize> {
        let list = self.run_git(&["stash", "list"])?;
        Ok(list.lines().filter(|line| !line.is_empty()).count())
    }

    fn diff(&self, range: &str) -> Result<String> {
        self.run_git(&[
            "-c",
            "core.quotePath=false",
            "diff",
            "-M",
            "--no-color",
            "--no-ext-diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            range,
            "--",
        ])
    }

    fn log(&self, range: &str) -> Result<String> {
        self.run_git(&["log", range, "--"])
    }

    fn status(&self) -> Result<String> {
        self.run_git(&["status", "--untracked-files=no"])
    }

    fn add_remote(&self, name: &str, url: &Path) -> Result<()> {
        let url = url.to_str().ok_or(LgError::InvalidUtf8Path)?;
        self.run_git(&["remote", "add", name, url]).map(|_| ())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.run_git(&["fetch", "-q", remote]).map(|_| ())
    }

    fn reset_soft(&self, rev: &str) -> Result<()> {
        self.run_git(&["reset", "-q", "--soft", rev]).map(|_| ())
    }

    fn reset_index(&self) -> Result<()> {
        self.run_git(&["reset", "-q"]).map(|_| ())
    }
}
