#![allow(dead_code)]

use docsync::reconciliation::{Decider, Decision, SyncAction, SyncRoots};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create `primary/` and `secondary/` roots inside a temp dir
pub fn create_tree_pair(temp_dir: &TempDir) -> (PathBuf, PathBuf) {
    let primary = temp_dir.path().join("primary");
    let secondary = temp_dir.path().join("secondary");
    fs::create_dir_all(&primary).expect("Should create primary root");
    fs::create_dir_all(&secondary).expect("Should create secondary root");
    (primary, secondary)
}

/// Write a file (creating parent directories) and pin its modification time
pub fn write_file(root: &Path, relative: &str, content: &str, mtime_secs: i64) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).expect("Should create parent dirs");
    fs::write(&path, content).expect("Should write file");
    set_mtime(&path, mtime_secs);
    path
}

pub fn set_mtime(path: &Path, secs: i64) {
    set_file_mtime(path, FileTime::from_unix_time(secs, 0)).expect("Should set mtime");
}

pub fn mtime_secs(path: &Path) -> i64 {
    let metadata = fs::metadata(path).expect("Should read metadata");
    FileTime::from_last_modification_time(&metadata).unix_seconds()
}

/// Write a minimal .docx container with one paragraph per entry
pub fn write_docx(root: &Path, relative: &str, paragraphs: &[&str], mtime_secs: i64) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).expect("Should create parent dirs");

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let file = fs::File::create(&path).expect("Should create docx");
    let mut writer = zip::ZipWriter::new(file);
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .expect("Should start zip entry");
    writer.write_all(xml.as_bytes()).expect("Should write xml");
    writer.finish().expect("Should finish zip");

    set_mtime(&path, mtime_secs);
    path
}

/// Decider that returns a fixed decision and remembers every question
pub struct RecordingDecider {
    pub decision: Decision,
    pub questions: Vec<String>,
}

impl RecordingDecider {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            questions: Vec::new(),
        }
    }
}

impl Decider for RecordingDecider {
    fn decide(&mut self, action: &SyncAction, roots: &SyncRoots) -> Decision {
        self.questions.push(action.question(roots));
        self.decision
    }
}

/// Decider that hands out decisions in order, then repeats the last one
pub struct ScriptedDecider {
    pub decisions: Vec<Decision>,
    pub asked: usize,
}

impl ScriptedDecider {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { decisions, asked: 0 }
    }
}

impl Decider for ScriptedDecider {
    fn decide(&mut self, _action: &SyncAction, _roots: &SyncRoots) -> Decision {
        let index = self.asked.min(self.decisions.len().saturating_sub(1));
        self.asked += 1;
        self.decisions.get(index).copied().unwrap_or(Decision::Skip)
    }
}

/// Whether the filesystem under `path` reports file creation times
pub fn supports_creation_time(path: &Path) -> bool {
    fs::metadata(path).and_then(|m| m.created()).is_ok()
}
