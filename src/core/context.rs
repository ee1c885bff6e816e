//! Per-invocation repository context.
//!
//! [`RepoContext`] is built once at the start of a command by querying the
//! [`Vcs`] and then handed to every workflow step, so no step re-reads branch
//! state halfway through an operation.

use crate::core::{
    error::{LgError, Result},
    git::Vcs,
};
use std::path::PathBuf;

/// Name of the branch mirroring the p4 depot
pub const BASELINE_BRANCH: &str = "baseline";
/// Baseline name used by repositories created under the older convention
pub const LEGACY_BASELINE_BRANCH: &str = "p4";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    /// Canonical working-tree root
    pub root: PathBuf,
    /// Baseline branch name in use by this repository
    pub baseline: String,
    /// Checked-out branch, `None` when detached
    pub current: Option<String>,
}

impl RepoContext {
    pub fn load(vcs: &dyn Vcs) -> Result<Self> {
        let root = vcs.workdir().canonicalize()?;
        let branches = vcs.local_branches()?;
        let baseline = detect_baseline(&branches).ok_or_else(|| LgError::NotAnLgRepository {
            baseline: BASELINE_BRANCH.to_string(),
            legacy: LEGACY_BASELINE_BRANCH.to_string(),
        })?;
        let current = vcs.current_branch()?;

        log::debug!(
            "context: root={} baseline={} current={:?}",
            root.display(),
            baseline,
            current
        );

        Ok(RepoContext {
            root,
            baseline: baseline.to_string(),
            current,
        })
    }

    pub fn is_on_baseline(&self) -> bool {
        self.current.as_deref() == Some(self.baseline.as_str())
    }

    /// The current topic branch, or the reason there is none
    pub fn require_topic(&self) -> Result<&str> {
        match self.current.as_deref() {
            None => Err(LgError::DetachedHead),
            Some(branch) if branch == self.baseline => Err(LgError::OnBaselineBranch {
                baseline: self.baseline.clone(),
            }),
            Some(branch) => Ok(branch),
        }
    }

    pub fn require_baseline(&self) -> Result<()> {
        if self.is_on_baseline() {
            return Ok(());
        }
        Err(LgError::NotOnBaselineBranch {
            baseline: self.baseline.clone(),
            current: self
                .current
                .clone()
                .unwrap_or_else(|| "detached HEAD".to_string()),
        })
    }
}

/// Pick the baseline branch, preferring the current name over the legacy one
pub fn detect_baseline(branches: &[String]) -> Option<&'static str> {
    [BASELINE_BRANCH, LEGACY_BASELINE_BRANCH]
        .into_iter()
        .find(|name| branches.iter().any(|branch| branch == name))
}

/// Reject topic names that would be mistaken for a baseline
pub fn validate_topic_name(name: &str) -> Result<()> {
    if name == BASELINE_BRANCH || name == LEGACY_BASELINE_BRANCH {
        return Err(LgError::ReservedBranchName {
            name: name.to_string(),
        });
    }
    Ok(())
}
