//! `lg export`: reflect the topic branch into a pending p4 changelist.
//!
//! The plan is the export-mode translation of `<baseline>..HEAD`. A dry run
//! prints it; otherwise every command is run even after failures, and the
//! failures are reported together at the end.

use crate::core::{
    config::Settings,
    context::RepoContext,
    diff_parser::translate,
    error::{LgError, Result},
    file_change::TranslateMode,
    git::{GitRepo, Vcs},
    p4::{export_commands, LegacyScm, P4Client, P4Command},
    print_info, print_success,
};
use std::env;
use std::path::Path;

/// Result of running one p4 command
#[derive(Debug)]
pub struct ExportOutcome {
    pub command: P4Command,
    pub result: std::result::Result<(), String>,
}

impl ExportOutcome {
    pub fn failed(&self) -> bool {
        self.result.is_err()
    }
}

pub fn execute_export(dry_run: bool) -> Result<()> {
    let git_repo = GitRepo::open(env::current_dir()?)?;
    let ctx = RepoContext::load(&git_repo)?;
    let commands = export_plan(&ctx, &git_repo)?;

    if dry_run {
        for command in &commands {
            println!("{command}");
        }
        return Ok(());
    }

    if commands.is_empty() {
        print_info(&format!("No changes between '{}' and HEAD", ctx.baseline));
        return Ok(());
    }

    let settings = Settings::resolve(None)?;
    let client = P4Client::new(settings.p4_binary);
    let outcomes = apply_export(&client, &ctx.root, commands)?;
    let ran = outcomes.len();
    summarize(outcomes)?;

    print_success(&format!("Ran {ran} p4 command(s)"));
    Ok(())
}

/// p4 commands that mirror the topic branch's commits
pub fn export_plan(ctx: &RepoContext, vcs: &dyn Vcs) -> Result<Vec<P4Command>> {
    ctx.require_topic()?;
    let diff = vcs.diff(&format!("{}..HEAD", ctx.baseline))?;
    let changes = translate(&diff, TranslateMode::Export)?;
    Ok(export_commands(&changes))
}

/// Run every command in `root`, continuing past failures.
///
/// The client is checked before anything runs: it must have a root, and the
/// repository must sit inside it.
pub fn apply_export(
    scm: &dyn LegacyScm,
    root: &Path,
    commands: Vec<P4Command>,
) -> Result<Vec<ExportOutcome>> {
    let client_root = scm.client_root()?;
    let canonical_client_root = client_root.canonicalize().unwrap_or(client_root);
    if !root.starts_with(&canonical_client_root) {
        return Err(LgError::OutsideClientRoot {
            root: root.to_path_buf(),
            client_root: canonical_client_root,
        });
    }

    let outcomes = commands
        .into_iter()
        .map(|command| {
            let result = scm.run(&command, root).map_err(|e| {
                log::warn!("{e}");
                e.to_string()
            });
            ExportOutcome { command, result }
        })
        .collect();
    Ok(outcomes)
}

/// Collapse outcomes into `ExportFailed` listing each failed command
pub fn summarize(outcomes: Vec<ExportOutcome>) -> Result<()> {
    let failed: Vec<String> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome.result {
            Ok(()) => None,
            Err(message) => Some(format!("{}: {message}", outcome.command)),
        })
        .collect();
    if failed.is_empty() {
        Ok(())
    } else {
        Err(LgError::ExportFailed { failed })
    }
}
