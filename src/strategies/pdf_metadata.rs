//! Last-resort backend: render whatever the PDF's info dictionary and
//! structure reveal as text. Produces little, but for otherwise unreadable
//! documents a title and page count beat nothing. Never in the default
//! cascade; enabled by name.

use std::fmt::Write as _;

use lopdf::Object;

use crate::document::{Document, DocumentFormat};
use crate::strategy::{Strategy, StrategyError, StrategyKind, StrategyOutput};

pub struct PdfMetadataStrategy;

impl PdfMetadataStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfMetadataStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a PDF text string. UTF-16BE with BOM, otherwise treated as latin-ish
/// bytes and decoded lossily.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

impl Strategy for PdfMetadataStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PdfMetadata
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
                "metadata backend only handles pdf, got {}",
                document.format()
            )));
        }

        let pdf = lopdf::Document::load_mem(document.bytes())
            .map_err(|e| StrategyError::Failed(format!("lopdf parse failed: {}", e)))?;

        let page_count = pdf.get_pages().len() as u32;
        let mut text = String::from("PDF metadata:\n");
        let _ = writeln!(text, "- Pages: {}", page_count);

        let info = pdf
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|obj| match obj {
                Object::Reference(id) => pdf.get_object(*id).ok(),
                other => Some(other),
            })
            .and_then(|obj| obj.as_dict().ok());

        if let Some(info) = info {
            for (key, label) in [
                (&b"Title"[..], "Title"),
                (&b"Author"[..], "Author"),
                (&b"Subject"[..], "Subject"),
                (&b"Creator"[..], "Creator"),
            ] {
                if let Ok(Object::String(bytes, _)) = info.get(key) {
                    let value = decode_pdf_string(bytes);
                    let value = value.trim();
                    if !value.is_empty() {
                        let _ = writeln!(text, "- {}: {}", label, value);
                    }
                }
            }
        }

        Ok(StrategyOutput {
            text,
            page_count: Some(page_count),
        })
    }
}
