//! Notes for decisions the user postponed.
//!
//! Each note is appended to a markdown file under a timestamp heading so
//! it can be worked through by hand after the run.

use crate::utils::{now_local, FOLLOW_UP_FILE};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only follow-up task file
#[derive(Debug, Clone)]
pub struct FollowUpLog {
    path: PathBuf,
}

impl Default for FollowUpLog {
    fn default() -> Self {
        Self::new(FOLLOW_UP_FILE)
    }
}

impl FollowUpLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a task under a timestamp heading
    pub fn append(&self, task: &str) -> Result<(), std::io::Error> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "### {}\n{}\n\n", now_local(), task.trim())?;
        Ok(())
    }
}
