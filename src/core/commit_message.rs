//! Commit message for baseline imports.

use std::path::Path;

/// Widest message kept on one line
pub const MESSAGE_WIDTH: usize = 77;
const PREFIX: &str = "Import ";
const ELLIPSIS: &str = "...";

/// Message for importing `paths` (repository-relative).
///
/// Full paths if they fit in [`MESSAGE_WIDTH`], basenames otherwise, and a
/// truncated basename list ending in `...` as a last resort.
pub fn import_message(paths: &[String]) -> String {
    let full = format!("{PREFIX}{}", paths.join(" "));
    if full.chars().count() <= MESSAGE_WIDTH {
        return full;
    }

    let basenames: Vec<String> = paths
        .iter()
        .map(|path| {
            Path::new(path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone())
        })
        .collect();
    let short = format!("{PREFIX}{}", basenames.join(" "));
    if short.chars().count() <= MESSAGE_WIDTH {
        return short;
    }

    let keep = MESSAGE_WIDTH - ELLIPSIS.len();
    let mut truncated: String = short.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
