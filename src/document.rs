//! Document model: immutable bytes plus a declared or sniffed format tag.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Formats the extraction pipeline knows how to handle.
///
/// Anything outside this set is rejected up front with
/// `Classification::UnsupportedFormat`; there is no catch-all variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Csv,
    Json,
    Html,
    Markdown,
    SourceCode,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
            DocumentFormat::Csv => "csv",
            DocumentFormat::Json => "json",
            DocumentFormat::Html => "html",
            DocumentFormat::Markdown => "markdown",
            DocumentFormat::SourceCode => "source-code",
        }
    }

    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" | "doc" => Some(DocumentFormat::Docx),
            "txt" | "text" | "log" => Some(DocumentFormat::Txt),
            "csv" | "tsv" => Some(DocumentFormat::Csv),
            "json" => Some(DocumentFormat::Json),
            "html" | "htm" => Some(DocumentFormat::Html),
            "md" | "markdown" => Some(DocumentFormat::Markdown),
            "py" | "rs" | "js" | "ts" | "go" | "java" | "c" | "cpp" | "h" | "rb" | "sh" => {
                Some(DocumentFormat::SourceCode)
            }
            _ => None,
        }
    }

    /// Parse a format tag as it appears in configuration or CLI arguments.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_lowercase().as_str() {
            "source-code" | "source_code" | "code" => Some(DocumentFormat::SourceCode),
            other => Self::from_extension(other),
        }
    }

    /// Sniff a format from magic bytes. Only binary container formats are
    /// reliably detectable; text formats fall back to the extension.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        let kind = infer::get(bytes)?;
        match kind.mime_type() {
            "application/pdf" => Some(DocumentFormat::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(DocumentFormat::Docx)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ingested document. Immutable once constructed: strategies borrow it,
/// never mutate it.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    format: DocumentFormat,
    source: Option<String>,
}

impl Document {
    /// Build a document from raw bytes and a declared format tag.
    pub fn from_bytes(bytes: Vec<u8>, format: DocumentFormat) -> Self {
        Self {
            bytes,
            format,
            source: None,
        }
    }

    /// Read a document from disk, sniffing the format from magic bytes and
    /// falling back to the file extension. Magic bytes win when both are
    /// present and disagree (extensions lie more often than headers do).
    pub fn from_path(path: &Path) -> std::io::Result<Option<Self>> {
        let bytes = std::fs::read(path)?;
        let by_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DocumentFormat::from_extension);
        let format = match DocumentFormat::sniff(&bytes).or(by_ext) {
            Some(f) => f,
            None => return Ok(None),
        };
        Ok(Some(Self {
            bytes,
            format,
            source: Some(path.display().to_string()),
        }))
    }

    /// Attach a source name (file path, URL) for logs and traces.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Content digest, used for log correlation and caller-side dedup.
    pub fn digest(&self) -> String {
        blake3::hash(&self.bytes).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_mapping_covers_supported_set() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("doc"), Some(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_extension("md"), Some(DocumentFormat::Markdown));
        assert_eq!(DocumentFormat::from_extension("py"), Some(DocumentFormat::SourceCode));
        assert_eq!(DocumentFormat::from_extension("exe"), None);
    }

    #[test]
    fn tag_parsing_accepts_canonical_names() {
        assert_eq!(DocumentFormat::from_tag("source-code"), Some(DocumentFormat::SourceCode));
        assert_eq!(DocumentFormat::from_tag("html"), Some(DocumentFormat::Html));
        assert_eq!(DocumentFormat::from_tag("elf"), None);
    }

    #[test]
    fn sniff_detects_pdf_magic() {
        let bytes = b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n".to_vec();
        assert_eq!(DocumentFormat::sniff(&bytes), Some(DocumentFormat::Pdf));
    }

    #[test]
    fn sniff_ignores_plain_text() {
        assert_eq!(DocumentFormat::sniff(b"hello world"), None);
    }

    #[test]
    fn from_path_prefers_magic_bytes_over_a_lying_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mislabeled.txt");
        std::fs::write(&path, b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n").unwrap();

        let doc = Document::from_path(&path).unwrap().unwrap();
        assert_eq!(doc.format(), DocumentFormat::Pdf);
    }

    #[test]
    fn from_path_falls_back_to_extension_for_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, b"# no magic bytes here").unwrap();

        let doc = Document::from_path(&path).unwrap().unwrap();
        assert_eq!(doc.format(), DocumentFormat::Markdown);
    }

    #[test]
    fn digest_is_stable_for_identical_content() {
        let a = Document::from_bytes(b"same".to_vec(), DocumentFormat::Txt);
        let b = Document::from_bytes(b"same".to_vec(), DocumentFormat::Txt);
        assert_eq!(a.digest(), b.digest());
    }
}
