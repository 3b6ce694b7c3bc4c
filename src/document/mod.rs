//! Comparable text for document-like files and line diffs between them.

mod diff;
mod extract;

pub use diff::{diff_documents, DocumentDiff};
pub use extract::{comparable_text, extract_text, is_document, ExtractError};
