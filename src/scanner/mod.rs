//! Recursive tree scanning under exclusion rules.
//!
//! A scan collects every regular file under a root, keyed by its
//! slash-separated relative path. Symbolic links and special files are not
//! entries. Files whose metadata cannot be read, or whose names are not
//! valid Unicode, are skipped and reported in [`ScanOutcome::warnings`]
//! instead of failing the whole scan.

mod rules;
mod types;

pub use rules::{ExclusionReason, ExclusionRules};
pub use types::{FileEntry, FileTree, ScanOutcome, ScanWarning};

use crate::utils::to_relative_key;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory '{0}' does not exist")]
    RootNotFound(PathBuf),

    #[error("Scan cancelled")]
    Cancelled,
}

/// Walks a directory tree and collects file metadata
#[derive(Debug, Clone, Default)]
pub struct TreeScanner {
    rules: ExclusionRules,
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl TreeScanner {
    pub fn new(rules: ExclusionRules) -> Self {
        Self {
            rules,
            cancel_flag: None,
        }
    }

    /// Attach a flag that aborts the scan once set
    pub fn with_cancel(mut self, cancel_flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(cancel_flag);
        self
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .map(|f| f.load(Ordering::Relaxed))
            .unwrap_or(false)
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        if entry.depth() > 0
            && entry.file_type().is_dir()
            && self.rules.prunes_dir(entry.file_name())
        {
            debug!("Excluding directory: {}", entry.path().display());
            return false;
        }
        true
    }

    /// Scan a root directory
    pub fn scan(&self, root: &Path) -> Result<ScanOutcome, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }

        debug!("Scanning {}", root.display());
        let mut outcome = ScanOutcome::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| self.keep_entry(e));

        for entry in walker {
            if self.is_cancelled() {
                return Err(ScanError::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    outcome.warnings.push(ScanWarning {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let Some(relative) = to_relative_key(relative) else {
                warn!("Skipping file with a non-Unicode name: {}", entry.path().display());
                outcome.warnings.push(ScanWarning {
                    path: entry.path().to_path_buf(),
                    message: "file name is not valid Unicode".to_string(),
                });
                continue;
            };

            if let Some(reason) = self.rules.check(&relative) {
                debug!(?reason, "Excluding file: {}", relative);
                outcome.excluded += 1;
                continue;
            }

            match read_entry(&entry, relative) {
                Ok(file) => {
                    outcome.files.insert(file.relative_path.clone(), file);
                }
                Err(e) => {
                    warn!("Cannot read metadata of {}: {}", entry.path().display(), e);
                    outcome.warnings.push(ScanWarning {
                        path: entry.path().to_path_buf(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Scanned {}: {} files, {} excluded, {} unreadable",
            root.display(),
            outcome.files.len(),
            outcome.excluded,
            outcome.warnings.len()
        );

        Ok(outcome)
    }
}

fn read_entry(entry: &DirEntry, relative_path: String) -> Result<FileEntry, std::io::Error> {
    let metadata = entry.metadata().map_err(std::io::Error::from)?;
    Ok(FileEntry {
        relative_path,
        absolute_path: entry.path().to_path_buf(),
        modified: metadata.modified()?,
        created: metadata.created().ok(),
        size: metadata.len(),
    })
}
