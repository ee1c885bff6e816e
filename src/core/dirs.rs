use crate::core::error::LgError;
use std::path::{Path, PathBuf};

pub fn get_config_directory() -> Result<PathBuf, LgError> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => {
            std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| dirs::home_dir().unwrap_or_default().join(".config"))
        },
        "macos" => {
            dirs::home_dir()
                .unwrap_or_default()
                .join("Library/Application Support")
        },
        _ => dirs::config_dir().unwrap_or_default(),
    };

    Ok(base.join("lg"))
}

/// Out-of-tree metadata location for the working tree at `root`.
///
/// The basename keeps the directory recognizable; the hash keeps two trees
/// with the same basename apart.
pub fn metadata_directory(prefix: &Path, root: &Path) -> PathBuf {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    let hash = format!("{:x}", md5::compute(root.to_string_lossy().as_bytes()));
    prefix.join(format!("{}-{}.git", name, &hash[..8]))
}
