use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// A regular file found under a tree root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Slash-separated path relative to the tree root
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub modified: SystemTime,
    /// Not every platform or filesystem records a creation time
    pub created: Option<SystemTime>,
    pub size: u64,
}

/// Relative path -> entry, ordered by path
pub type FileTree = BTreeMap<String, FileEntry>;

/// A file that was seen but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Everything one scan of a tree produced
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub files: FileTree,
    pub warnings: Vec<ScanWarning>,
    /// Number of files left out by the exclusion rules
    pub excluded: usize,
}
