use super::extract::{comparable_text, is_document};
use similar::TextDiff;
use std::path::Path;

/// Outcome of comparing the text of two documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentDiff {
    /// Extracted text is the same on both sides
    Identical,
    /// Unified diff from the old document to the new one
    Changed(String),
    /// Not a document type with extractable text
    Unsupported,
}

/// Diff the text content of two documents
pub fn diff_documents(old: &Path, new: &Path) -> DocumentDiff {
    if !is_document(old) || !is_document(new) {
        return DocumentDiff::Unsupported;
    }

    let old_text = comparable_text(old);
    let new_text = comparable_text(new);
    DocumentDiff::from_texts(&old_text, &new_text, old, new)
}

impl DocumentDiff {
    pub fn from_texts(old_text: &str, new_text: &str, old: &Path, new: &Path) -> Self {
        if old_text == new_text {
            return DocumentDiff::Identical;
        }

        let old_header = old.display().to_string();
        let new_header = new.display().to_string();
        let diff = TextDiff::from_lines(old_text, new_text);
        let rendered = diff
            .unified_diff()
            .context_radius(3)
            .header(&old_header, &new_header)
            .to_string();

        DocumentDiff::Changed(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_documents_are_unsupported() {
        assert_eq!(
            diff_documents(Path::new("a.txt"), Path::new("b.txt")),
            DocumentDiff::Unsupported
        );
    }

    #[test]
    fn test_identical_texts() {
        let diff = DocumentDiff::from_texts("a\nb", "a\nb", Path::new("x"), Path::new("y"));
        assert_eq!(diff, DocumentDiff::Identical);
    }

    #[test]
    fn test_changed_texts_render_unified_diff() {
        let diff = DocumentDiff::from_texts(
            "line one\nline two\n",
            "line one\nline 2\n",
            Path::new("old.docx"),
            Path::new("new.docx"),
        );

        match diff {
            DocumentDiff::Changed(text) => {
                assert!(text.contains("--- old.docx"));
                assert!(text.contains("+++ new.docx"));
                assert!(text.contains("-line two"));
                assert!(text.contains("+line 2"));
            }
            other => panic!("expected a diff, got {:?}", other),
        }
    }
}
