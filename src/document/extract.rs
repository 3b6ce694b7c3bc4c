use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid document container: {0}")]
    ZipError(#[from] zip::result::ZipError),
}

const DOCUMENT_PART: &str = "word/document.xml";

fn paragraph_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<w:p(?:\s[^>]*?)?(?:/>|>(.*?)</w:p>)").expect("valid paragraph pattern")
    })
}

fn text_run_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:(?:br|cr)(\s[^>]*?)?/>")
            .expect("valid text run pattern")
    })
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#x[0-9a-fA-F]+|#[0-9]+|lt|gt|quot|apos|amp);").expect("valid entity pattern")
    })
}

/// Whether a file is a document whose text can be extracted and diffed
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}

/// Extract paragraph text from a .docx file, one line per paragraph
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    Ok(paragraphs_from_xml(&xml))
}

/// Extracted text, or a bracketed error marker when extraction fails
pub fn comparable_text(path: &Path) -> String {
    match extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            let message = format!("[Error extracting text from {}: {}]", path.display(), e);
            warn!("{}", message);
            message
        }
    }
}

fn paragraphs_from_xml(xml: &str) -> String {
    paragraph_regex()
        .captures_iter(xml)
        .map(|para| {
            let body = para.get(1).map(|m| m.as_str()).unwrap_or("");
            text_run_regex()
                .captures_iter(body)
                .map(|run| match run.get(1) {
                    Some(text) => unescape_xml(text.as_str()),
                    None => break_text(&run[0], run.get(2).map(|m| m.as_str())),
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Tabs and line breaks; page and column breaks carry no text
fn break_text(element: &str, attributes: Option<&str>) -> String {
    if element.starts_with("<w:tab") {
        return "\t".to_string();
    }
    match attributes {
        Some(attrs) if attrs.contains("w:type=") && !attrs.contains("textWrapping") => {
            String::new()
        }
        _ => "\n".to_string(),
    }
}

fn unescape_xml(text: &str) -> String {
    entity_regex()
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .unwrap_or_else(|| entity[1..].parse())
                    .ok()
                    .and_then(char::from_u32),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
