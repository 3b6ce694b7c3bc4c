use std::collections::BTreeSet;
use std::ffi::OsStr;

/// Why a path was left out of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    FileName,
    DirectorySegment,
}

/// Exclusion lists applied while scanning a tree.
///
/// File names match the last path segment exactly. Directory names match
/// any segment of the root-relative path, including the file's own name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    excluded_files: BTreeSet<String>,
    excluded_dirs: BTreeSet<String>,
}

impl ExclusionRules {
    pub fn new<F, D>(excluded_files: F, excluded_dirs: D) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            excluded_files: excluded_files.into_iter().map(Into::into).collect(),
            excluded_dirs: excluded_dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn excluded_files(&self) -> impl Iterator<Item = &str> {
        self.excluded_files.iter().map(String::as_str)
    }

    pub fn excluded_dirs(&self) -> impl Iterator<Item = &str> {
        self.excluded_dirs.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.excluded_files.is_empty() && self.excluded_dirs.is_empty()
    }

    /// Check a slash-separated root-relative path against both lists
    pub fn check(&self, relative_path: &str) -> Option<ExclusionReason> {
        let mut segments = relative_path.split('/').filter(|s| !s.is_empty()).peekable();
        let mut reason = None;

        while let Some(segment) = segments.next() {
            if self.excluded_dirs.contains(segment) {
                return Some(ExclusionReason::DirectorySegment);
            }
            if segments.peek().is_none() && self.excluded_files.contains(segment) {
                reason = Some(ExclusionReason::FileName);
            }
        }

        reason
    }

    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.check(relative_path).is_some()
    }

    /// Whether a directory with this name should not be descended into
    pub(crate) fn prunes_dir(&self, name: &OsStr) -> bool {
        name.to_str()
            .map(|n| self.excluded_dirs.contains(n))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExclusionRules {
        ExclusionRules::new(["Thumbs.db"], ["Archive", ".git"])
    }

    #[test]
    fn test_excluded_file_name() {
        assert_eq!(rules().check("a/b/Thumbs.db"), Some(ExclusionReason::FileName));
        assert_eq!(rules().check("Thumbs.db"), Some(ExclusionReason::FileName));
    }

    #[test]
    fn test_file_name_must_match_exactly() {
        assert_eq!(rules().check("a/Thumbs.db.bak"), None);
        assert_eq!(rules().check("Thumbs.db/readme.txt"), None);
    }

    #[test]
    fn test_excluded_dir_any_segment() {
        assert_eq!(
            rules().check("Archive/old.docx"),
            Some(ExclusionReason::DirectorySegment)
        );
        assert_eq!(
            rules().check("x/y/Archive/z/old.docx"),
            Some(ExclusionReason::DirectorySegment)
        );
    }

    #[test]
    fn test_excluded_dir_matches_file_itself() {
        assert_eq!(
            rules().check("docs/Archive"),
            Some(ExclusionReason::DirectorySegment)
        );
    }

    #[test]
    fn test_partial_segment_does_not_match() {
        assert!(!rules().is_excluded("Archives/old.docx"));
        assert!(!rules().is_excluded("my.git/file"));
    }

    #[test]
    fn test_empty_rules() {
        let rules = ExclusionRules::default();
        assert!(rules.is_empty());
        assert!(!rules.is_excluded("anything/at/all.txt"));
    }
}
