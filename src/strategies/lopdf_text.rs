//! Pure Rust PDF text extraction via the lopdf crate.
//!
//! Slower than pdftotext on well-formed files but tolerates some documents
//! poppler rejects, and needs no external binaries. Second in the default
//! cascade.

use tracing::debug;

use crate::document::{Document, DocumentFormat};
use crate::strategy::{Strategy, StrategyError, StrategyKind, StrategyOutput};

pub struct LopdfTextStrategy;

impl LopdfTextStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LopdfTextStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for LopdfTextStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::LopdfText
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "always available (built in)".to_string()
    }

    fn run(&self, document: &Document) -> Result<StrategyOutput, StrategyError> {
        if document.format() != DocumentFormat::Pdf {
            return Err(StrategyError::Failed(format!(
                "lopdf only handles pdf, got {}",
                document.format()
            )));
        }

        let pdf = lopdf::Document::load_mem(document.bytes())
            .map_err(|e| StrategyError::Failed(format!("lopdf parse failed: {}", e)))?;

        if pdf.is_encrypted() {
            return Err(StrategyError::Failed("document is encrypted".to_string()));
        }

        let pages = pdf.get_pages();
        let page_count = pages.len() as u32;

        // Extract page by page so one malformed content stream doesn't
        // discard the rest of the document.
        let mut page_texts: Vec<String> = Vec::with_capacity(pages.len());
        for page_num in pages.keys() {
            match pdf.extract_text(&[*page_num]) {
                Ok(text) => page_texts.push(text),
                Err(e) => {
                    debug!("lopdf: page {} extraction failed: {}", page_num, e);
                }
            }
        }

        if page_texts.is_empty() && page_count > 0 {
            return Err(StrategyError::Failed(format!(
                "no text recovered from any of {} pages",
                page_count
            )));
        }

        Ok(StrategyOutput {
            text: page_texts.join("\n\n"),
            page_count: Some(page_count),
        })
    }
}
