//! Structured PDF text extraction via poppler's `pdftotext`.

use std::path::Path;
use std::process::Command;

use crate::document::{Document, DocumentFormat};
use crate::strategy::{Strategy, StrategyError, StrategyKind, StrategyOutput};

use super::{check_binary, handle_cmd_output, spill_to_tempfile};

/// The cheapest, most reliable backend for PDFs that carry a text layer.
/// First in the default cascade.
pub struct PdfToTextStrategy;

impl PdfToTextStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Run pdftotext over the whole file, writing to stdout.
    fn run_pdftotext(&self, file_path: &Path) -> Result<String, StrategyError> {
        let output = Command::new("pdftotext")
            .args(["-layout", "-enc", "UTF-8"])
            .arg(file_path)
            .arg("-")
            .output();

        handle_cmd_output(output, "pdftotext (install poppler-utils)", "pdftotext failed")
    }

    /// Get the page count from pdfinfo. Best effort only.
    fn page_count(&self, file_path: &Path) -> Option<u32> {
        let output = Command::new("pdfinfo").arg(file_path).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            if line.starts_with("Pages:") {
                return line.split_whitespace().nth(1).and_then(|s| s.parse().ok());
            }
        }
        None
    }
}

impl Default for PdfToTextStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for PdfToTextStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PdfToText
    }

    fn is_available(&self) -> bool {
        check_binary("pdftotext")
    }

    fn availability_hint(&self) -> String {
        "pdftotext not found (install poppler-utils)".to_string()
    }

    fn run(&self, document: &Document) -> Result<StrategyOutput, StrategyError> {
        if document.format() != DocumentFormat::Pdf {
            return Err(StrategyError::Failed(format!(
                "pdftotext only handles pdf, got {}",
                document.format()
            )));
        }
        let file = spill_to_tempfile(document, ".pdf")?;
        let text = self.run_pdftotext(file.path())?;
        let page_count = self.page_count(file.path());
        Ok(StrategyOutput { text, page_count })
    }
}
