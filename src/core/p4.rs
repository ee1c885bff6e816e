//! Perforce side of the export bridge.
//!
//! Maps export-mode [`FileChange`]s to p4 commands and runs them through the
//! [`LegacyScm`] capability, implemented for real by [`P4Client`].
//!
//! # Public API
//! - [`P4Command`], [`P4Op`]: one command line for the p4 client
//! - [`export_commands`]: changes to commands, escaping included
//! - [`escape_path`]: p4 reserved-character escaping
//! - [`LegacyScm`], [`P4Client`]: command execution

use crate::core::{
    error::{LgError, Result},
    file_change::{ChangeKind, FileChange},
};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum P4Op {
    Edit,
    Add,
    Delete,
    Move,
}

impl P4Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            P4Op::Edit => "edit",
            P4Op::Add => "add",
            P4Op::Delete => "delete",
            P4Op::Move => "move",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct P4Command {
    pub op: P4Op,
    pub args: Vec<String>,
}

impl P4Command {
    fn new(op: P4Op, args: Vec<String>) -> Self {
        Self { op, args }
    }
}

impl fmt::Display for P4Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op.as_str())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Percent-escape the characters p4 reserves in file specs.
/// `%` goes first so existing escapes are not decoded by p4.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '@' => escaped.push_str("%40"),
            '#' => escaped.push_str("%23"),
            '*' => escaped.push_str("%2A"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Translate export-mode changes into p4 commands, preserving order.
///
/// `add -f` takes the literal local filename and does its own escaping, so
/// added paths are passed through as-is.
pub fn export_commands(changes: &[FileChange]) -> Vec<P4Command> {
    changes
        .iter()
        .map(|change| match &change.kind {
            ChangeKind::Edit => P4Command::new(P4Op::Edit, vec![escape_path(&change.path)]),
            ChangeKind::Add => {
                // unescaped: with -f p4 reads the argument as a local file name
                P4Command::new(P4Op::Add, vec!["-f".to_string(), change.path.clone()])
            }
            ChangeKind::Delete => P4Command::new(P4Op::Delete, vec![escape_path(&change.path)]),
            ChangeKind::Move { from } => P4Command::new(
                P4Op::Move,
                vec![escape_path(from), escape_path(&change.path)],
            ),
        })
        .collect()
}

/// Issue-command capability of the legacy SCM
pub trait LegacyScm {
    /// Root of the client workspace; fails if the client is not usable
    fn client_root(&self) -> Result<PathBuf>;

    /// Run one command with `cwd` as the working directory
    fn run(&self, command: &P4Command, cwd: &Path) -> Result<()>;
}

/// Live p4 client that shells out to the `p4` binary
pub struct P4Client {
    binary: PathBuf,
}

impl P4Client {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> LgError {
        if e.kind() == ErrorKind::NotFound {
            LgError::P4NotFound {
                binary: self.binary.clone(),
            }
        } else {
            LgError::Io(e)
        }
    }
}

impl LegacyScm for P4Client {
    fn client_root(&self) -> Result<PathBuf> {
        log::debug!("{} info", self.binary.display());
        let output = Command::new(&self.binary)
            .arg("info")
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(LgError::P4CommandFailed {
                command: "info".to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_client_root(&String::from_utf8_lossy(&output.stdout)).ok_or(LgError::NoClientRoot)
    }

    fn run(&self, command: &P4Command, cwd: &Path) -> Result<()> {
        log::debug!("{} -s {command}", self.binary.display());
        let output = Command::new(&self.binary)
            .arg("-s")
            .arg(command.op.as_str())
            .args(&command.args)
            .current_dir(cwd)
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        match script_errors(&stdout, &stderr) {
            Some(message) => Err(LgError::P4CommandFailed {
                command: command.to_string(),
                message,
            }),
            None if !output.status.success() => Err(LgError::P4CommandFailed {
                command: command.to_string(),
                message: format!("exited with {}", output.status),
            }),
            None => Ok(()),
        }
    }
}

/// `Client root:` from `p4 info`; `*unknown*` and a missing line mean no client
fn parse_client_root(info: &str) -> Option<PathBuf> {
    info.lines()
        .filter_map(|line| line.strip_prefix("Client root:"))
        .map(str::trim)
        .find(|root| !root.is_empty() && *root != "*unknown*")
        .map(PathBuf::from)
}

/// p4 exits 0 even when a file operation is refused; in `-s` mode failures
/// show up as `error:` lines
fn script_errors(stdout: &str, stderr: &str) -> Option<String> {
    let errors: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .filter_map(|line| line.strip_prefix("error: "))
        .collect();
    if errors.is_empty() {
        None
    } else {
        Some(errors.join("; "))
    }
}
