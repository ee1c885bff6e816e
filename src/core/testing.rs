//! In-memory [`Vcs`] for workflow tests.
//!
//! Models just enough of git for the workflow engine: branches with a set of
//! tracked paths, a dirty flag standing in for working-tree edits, a stash
//! stack, and a call log the tests assert against. The working tree root is a
//! real temporary directory so path validation can hit the filesystem.

use crate::core::{
    error::{LgError, Result},
    git::{CommitOutcome, StageMode, Vcs},
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Default)]
struct State {
    current: Option<String>,
    branches: BTreeMap<String, BTreeSet<String>>,
    remote_branches: BTreeMap<String, BTreeSet<String>>,
    staged: Vec<String>,
    dirty: bool,
    stashes: Vec<String>,
    calls: Vec<String>,
    diff_text: String,
    fail_rebase: bool,
    fail_stash_pop: bool,
    fail_commit: bool,
}

pub struct FakeVcs {
    dir: TempDir,
    state: RefCell<State>,
}

impl FakeVcs {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            state: RefCell::new(State::default()),
        })
    }

    /// A repository freshly set up by `init`: baseline plus topic `work`
    pub fn initialized() -> Result<Self> {
        let fake = Self::new()?;
        fake.add_branch("baseline", &[]);
        fake.add_branch("work", &[]);
        fake.set_current(Some("work"));
        Ok(fake)
    }

    /// Create a file in the working tree
    pub fn touch(&self, relative: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, relative)?;
        Ok(path)
    }

    pub fn add_branch(&self, name: &str, tracked: &[&str]) {
        self.state.borrow_mut().branches.insert(
            name.to_string(),
            tracked.iter().map(|s| s.to_string()).collect(),
        );
    }

    pub fn add_remote_branch(&self, name: &str) {
        self.state
            .borrow_mut()
            .remote_branches
            .insert(name.to_string(), BTreeSet::new());
    }

    pub fn set_current(&self, branch: Option<&str>) {
        self.state.borrow_mut().current = branch.map(str::to_string);
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.state.borrow_mut().dirty = dirty;
    }

    pub fn set_diff(&self, text: &str) {
        self.state.borrow_mut().diff_text = text.to_string();
    }

    pub fn fail_rebase(&self) {
        self.state.borrow_mut().fail_rebase = true;
    }

    pub fn fail_stash_pop(&self) {
        self.state.borrow_mut().fail_stash_pop = true;
    }

    pub fn fail_commit(&self) {
        self.state.borrow_mut().fail_commit = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    pub fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    pub fn tracked(&self, branch: &str) -> BTreeSet<String> {
        self.state
            .borrow()
            .branches
            .get(branch)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Whether any recorded call starts with `prefix`
    pub fn called(&self, prefix: &str) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn current_name(&self) -> Result<String> {
        self.state
            .borrow()
            .current
            .clone()
            .ok_or(LgError::DetachedHead)
    }
}

impl Vcs for FakeVcs {
    fn workdir(&self) -> &Path {
        self.dir.path()
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.current())
    }

    fn local_branches(&self) -> Result<Vec<String>> {
        Ok(self.state.borrow().branches.keys().cloned().collect())
    }

    fn remote_branches(&self, _remote: &str) -> Result<Vec<String>> {
        Ok(self.state.borrow().remote_branches.keys().cloned().collect())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {branch}"));
        let mut state = self.state.borrow_mut();
        if !state.branches.contains_key(branch) {
            return Err(LgError::git_command_failed(&["checkout", branch], "no such branch"));
        }
        state.current = Some(branch.to_string());
        Ok(())
    }

    fn create_branch(&self, branch: &str) -> Result<()> {
        self.record(format!("branch {branch}"));
        let mut state = self.state.borrow_mut();
        let tracked = state
            .current
            .as_ref()
            .and_then(|current| state.branches.get(current))
            .cloned()
            .unwrap_or_default();
        state.branches.insert(branch.to_string(), tracked);
        state.current = Some(branch.to_string());
        Ok(())
    }

    fn tracked_files(&self, rev: &str) -> Result<BTreeSet<String>> {
        let branch = if rev == "HEAD" {
            self.current_name()?
        } else {
            rev.to_string()
        };
        self.state
            .borrow()
            .branches
            .get(&branch)
            .cloned()
            .ok_or_else(|| LgError::git_command_failed(&["ls-tree", rev], "unknown revision"))
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.is_dirty())
    }

    fn stage(&self, paths: &[String], mode: StageMode) -> Result<()> {
        let flag = match mode {
            StageMode::Force => "-f",
            StageMode::TrackedOnly => "-u",
        };
        self.record(format!("add {flag} {}", paths.join(" ")));
        self.state.borrow_mut().staged.extend(paths.iter().cloned());
        Ok(())
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<CommitOutcome> {
        self.record(format!("commit {message}"));
        let branch = self.current_name()?;
        let mut state = self.state.borrow_mut();
        if state.fail_commit {
            return Err(LgError::git_command_failed(&["commit"], "hook rejected commit"));
        }
        if state.staged.is_empty() && !allow_empty {
            return Ok(CommitOutcome::NothingToCommit);
        }
        let staged: Vec<String> = state.staged.drain(..).collect();
        state.branches.entry(branch).or_default().extend(staged);
        Ok(CommitOutcome::Committed)
    }

    fn rebase(&self, onto: &str) -> Result<()> {
        self.record(format!("rebase {onto}"));
        let branch = self.current_name()?;
        let mut state = self.state.borrow_mut();
        if state.fail_rebase {
            return Err(LgError::git_command_failed(&["rebase", onto], "CONFLICT (content)"));
        }
        let base = state.branches.get(onto).cloned().unwrap_or_default();
        state.branches.entry(branch).or_default().extend(base);
        Ok(())
    }

    fn stash_push(&self, message: &str) -> Result<()> {
        self.record("stash push".to_string());
        let mut state = self.state.borrow_mut();
        state.stashes.push(message.to_string());
        state.dirty = false;
        Ok(())
    }

    fn stash_pop(&self) -> Result<()> {
        self.record("stash pop".to_string());
        let mut state = self.state.borrow_mut();
        if state.fail_stash_pop {
            return Err(LgError::git_command_failed(&["stash", "pop"], "conflict in a.txt"));
        }
        state.stashes.pop();
        state.dirty = true;
        Ok(())
    }

    fn stash_len(&self) -> Result<usize> {
        Ok(self.state.borrow().stashes.len())
    }

    fn diff(&self, range: &str) -> Result<String> {
        self.record(format!("diff {range}"));
        Ok(self.state.borrow().diff_text.clone())
    }

    fn log(&self, range: &str) -> Result<String> {
        self.record(format!("log {range}"));
        Ok(format!("commit for {range}\n"))
    }

    fn status(&self) -> Result<String> {
        Ok("nothing to commit".to_string())
    }

    fn add_remote(&self, name: &str, url: &Path) -> Result<()> {
        self.record(format!("remote add {name} {}", url.display()));
        Ok(())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch {remote}"));
        Ok(())
    }

    fn reset_soft(&self, rev: &str) -> Result<()> {
        self.record(format!("reset --soft {rev}"));
        let branch = self.current_name()?;
        self.state
            .borrow_mut()
            .branches
            .entry(branch)
            .or_default();
        Ok(())
    }

    fn reset_index(&self) -> Result<()> {
        self.record("reset".to_string());
        Ok(())
    }
}
