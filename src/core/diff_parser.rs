//! Unified-diff to [`FileChange`] translation.
//!
//! The translator walks `git diff` output line by line. Each `diff --git` header
//! opens a section; the extended header lines that follow (`new file mode`,
//! `rename from`, `---`/`+++`, ...) refine the section's paths and kind. Hunk
//! bodies are skipped. Anything that does not look like git's diff format is
//! rejected rather than guessed at.
//!
//! # Public API
//! - [`translate`]: parse diff text into an ordered list of changes
//!
//! # Output order
//! Records follow diff-stream order. In [`TranslateMode::Export`] a rename yields an
//! `Edit` of the old path immediately followed by the `Move`.

use crate::core::{
    error::{LgError, Result},
    file_change::{FileChange, TranslateMode},
};

const HEADER_PREFIX: &str = "diff --git ";
const DEV_NULL: &str = "/dev/null";

#[derive(Debug, Default)]
struct Section {
    line: usize,
    header_old: Option<String>,
    header_new: Option<String>,
    minus: Option<String>,
    plus: Option<String>,
    rename_from: Option<String>,
    rename_to: Option<String>,
    copy_to: Option<String>,
    new_file: bool,
    deleted: bool,
    in_hunks: bool,
}

impl Section {
    fn open(line: usize, header: &str) -> Result<Self> {
        let split = split_header(header).map_err(|e| match e {
            LgError::DiffParse { message, .. } => LgError::diff_parse(line, message),
            other => other,
        })?;
        let (header_old, header_new) = match split {
            Some((old, new)) => (Some(old), Some(new)),
            None => (None, None),
        };
        Ok(Self {
            line,
            header_old,
            header_new,
            ..Default::default()
        })
    }

    fn absorb(&mut self, line_no: usize, line: &str) -> Result<()> {
        if self.in_hunks {
            return Ok(());
        }
        if line.starts_with("@@") {
            self.in_hunks = true;
        } else if line.starts_with("new file mode") {
            self.new_file = true;
        } else if line.starts_with("deleted file mode") {
            self.deleted = true;
        } else if let Some(rest) = line.strip_prefix("rename from ") {
            self.rename_from = Some(unquote(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("rename to ") {
            self.rename_to = Some(unquote(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("copy to ") {
            self.copy_to = Some(unquote(rest, line_no)?);
        } else if let Some(rest) = line.strip_prefix("--- ") {
            self.minus = marker_path(rest, "a/", line_no)?;
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            self.plus = marker_path(rest, "b/", line_no)?;
        }
        Ok(())
    }

    fn finish(self, mode: TranslateMode, out: &mut Vec<FileChange>) -> Result<()> {
        let old = self
            .rename_from
            .clone()
            .or_else(|| self.minus.clone())
            .or_else(|| self.header_old.clone());
        let new = self
            .rename_to
            .clone()
            .or_else(|| self.copy_to.clone())
            .or_else(|| self.plus.clone())
            .or_else(|| self.header_new.clone());
        let missing = || LgError::diff_parse(self.line, "cannot determine file paths");

        if self.deleted {
            out.push(FileChange::delete(old.ok_or_else(missing)?));
        } else if self.new_file || self.copy_to.is_some() {
            out.push(FileChange::add(new.ok_or_else(missing)?));
        } else if self.rename_from.is_some() {
            let from = old.ok_or_else(missing)?;
            let to = new.ok_or_else(missing)?;
            match mode {
                TranslateMode::Status => out.push(FileChange::edit(to)),
                TranslateMode::Export => {
                    out.push(FileChange::edit(from.clone()));
                    out.push(FileChange::moved(from, to));
                }
            }
        } else {
            out.push(FileChange::edit(new.ok_or_else(missing)?));
        }
        Ok(())
    }
}

/// Translate `git diff` output into normalized file changes
pub fn translate(diff: &str, mode: TranslateMode) -> Result<Vec<FileChange>> {
    let mut changes = Vec::new();
    let mut section: Option<Section> = None;

    for (index, line) in diff.lines().enumerate() {
        let line_no = index + 1;

        if let Some(header) = line.strip_prefix(HEADER_PREFIX) {
            if let Some(done) = section.take() {
                done.finish(mode, &mut changes)?;
            }
            section = Some(Section::open(line_no, header)?);
            continue;
        }

        if line.starts_with("diff ") {
            return Err(LgError::diff_parse(
                line_no,
                "expected 'diff --git' header (combined or external diffs are not supported)",
            ));
        }

        match section.as_mut() {
            Some(current) => current.absorb(line_no, line)?,
            None if line.trim().is_empty() => {}
            None => {
                return Err(LgError::diff_parse(
                    line_no,
                    "content before the first diff header",
                ))
            }
        }
    }

    if let Some(done) = section.take() {
        done.finish(mode, &mut changes)?;
    }

    log::debug!("translated diff into {} change(s)", changes.len());
    Ok(changes)
}

/// Recover `(old, new)` from the header remainder. `None` means the header is
/// ambiguous and later lines must supply the paths.
fn split_header(header: &str) -> Result<Option<(String, String)>> {
    if header.starts_with('"') {
        let (first, rest) = take_quoted(header)?;
        let rest = rest.trim_start();
        let second = if rest.starts_with('"') {
            take_quoted(rest)?.0
        } else {
            rest.to_string()
        };
        return Ok(Some((strip(&first, "a/")?, strip(&second, "b/")?)));
    }

    if header.ends_with('"') {
        if let Some(start) = header.find(" \"") {
            let first = &header[..start];
            let (second, _) = take_quoted(&header[start + 1..])?;
            return Ok(Some((strip(first, "a/")?, strip(&second, "b/")?)));
        }
    }

    // Unquoted paths may contain spaces. Without a rename both sides are equal,
    // so the header is "a/P b/P" and splits at its midpoint.
    if header.len() % 2 == 1 {
        let mid = header.len() / 2;
        if header.is_char_boundary(mid) && header.as_bytes()[mid] == b' ' {
            let (left, right) = (&header[..mid], &header[mid + 1..]);
            if let (Some(old), Some(new)) = (left.strip_prefix("a/"), right.strip_prefix("b/")) {
                if old == new {
                    return Ok(Some((old.to_string(), new.to_string())));
                }
            }
        }
    }

    let mut splits = header.match_indices(" b/");
    if let (Some((at, _)), None) = (splits.next(), splits.next()) {
        let (left, right) = (&header[..at], &header[at + 1..]);
        if let (Some(old), Some(new)) = (left.strip_prefix("a/"), right.strip_prefix("b/")) {
            return Ok(Some((old.to_string(), new.to_string())));
        }
    }

    Ok(None)
}

fn strip(token: &str, prefix: &str) -> Result<String> {
    token
        .strip_prefix(prefix)
        .map(str::to_string)
        .ok_or_else(|| LgError::diff_parse(0, format!("path '{token}' lacks the '{prefix}' prefix")))
}

/// Path from a `---`/`+++` line; `None` for `/dev/null`
fn marker_path(rest: &str, prefix: &str, line_no: usize) -> Result<Option<String>> {
    // git appends a tab when the name contains a space
    let rest = rest.trim_end_matches('\t');
    if rest == DEV_NULL {
        return Ok(None);
    }
    let token = unquote(rest, line_no)?;
    token
        .strip_prefix(prefix)
        .map(|path| Some(path.to_string()))
        .ok_or_else(|| {
            LgError::diff_parse(line_no, format!("path '{token}' lacks the '{prefix}' prefix"))
        })
}

fn unquote(token: &str, line_no: usize) -> Result<String> {
    if token.starts_with('"') {
        let (value, rest) = take_quoted(token).map_err(|_| {
            LgError::diff_parse(line_no, format!("malformed quoted path {token}"))
        })?;
        if !rest.trim().is_empty() {
            return Err(LgError::diff_parse(
                line_no,
                format!("trailing text after quoted path {token}"),
            ));
        }
        Ok(value)
    } else {
        Ok(token.to_string())
    }
}

/// Parse one C-style quoted token, returning it and the unconsumed remainder
fn take_quoted(input: &str) -> Result<(String, &str)> {
    let bytes = input.as_bytes();
    let malformed = || LgError::diff_parse(0, format!("malformed quoted path {input}"));
    if bytes.first() != Some(&b'"') {
        return Err(malformed());
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let value = String::from_utf8_lossy(&out).into_owned();
                return Ok((value, &input[i + 1..]));
            }
            b'\\' => {
                let escape = *bytes.get(i + 1).ok_or_else(malformed)?;
                match escape {
                    b'a' => out.push(0x07),
                    b'b' => out.push(0x08),
                    b't' => out.push(b'\t'),
                    b'n' => out.push(b'\n'),
                    b'v' => out.push(0x0b),
                    b'f' => out.push(0x0c),
                    b'r' => out.push(b'\r'),
                    b'"' => out.push(b'"'),
                    b'\\' => out.push(b'\\'),
                    b'0'..=b'7' => {
                        let digits = bytes.get(i + 1..i + 4).ok_or_else(malformed)?;
                        let mut value: u32 = 0;
                        for digit in digits {
                            if !(b'0'..=b'7').contains(digit) {
                                return Err(malformed());
                            }
                            value = value * 8 + u32::from(digit - b'0');
                        }
                        out.push(u8::try_from(value).map_err(|_| malformed())?);
                        i += 4;
                        continue;
                    }
                    _ => return Err(malformed()),
                }
                i += 2;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    Err(malformed())
}
