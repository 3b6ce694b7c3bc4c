mod hash;

pub use hash::{compute_file_hash, compute_hash, files_identical};

use std::path::{Component, Path, PathBuf};

/// The name of the per-user configuration folder
pub const CONFIG_FOLDER: &str = ".docsync";

/// The name of the profiles file inside the configuration folder
pub const PROFILES_FILE: &str = "profiles.json";

/// Default location of the follow-up task log
pub const FOLLOW_UP_FILE: &str = "follow_up_tasks.md";

/// Get the path to the per-user configuration folder (~/.docsync)
pub fn get_config_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .map(|home| PathBuf::from(home).join(CONFIG_FOLDER))
}

/// Get the default path to the profiles file (~/.docsync/profiles.json)
pub fn get_default_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(PROFILES_FILE))
}

/// Render a root-relative path with `/` separators, independent of platform.
///
/// Returns `None` when a segment is not valid Unicode; such a path has no
/// key that maps back to the file.
pub fn to_relative_key(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Last segment of a slash-separated relative path
pub fn base_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

/// Resolve a slash-separated relative path against a tree root
pub fn join_relative(root: &Path, relative_path: &str) -> PathBuf {
    relative_path
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

/// Get current local time formatted for human-readable logs
pub fn now_local() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
