//! Direct readers for text-bearing, non-PDF formats.
//!
//! These formats either are text already (txt, csv, markdown, source code)
//! or have a single obvious decode step (json pretty-print, html tag strip,
//! docx container unwrap), so they get one backend instead of a cascade.

use std::io::Read;

use regex::Regex;
use scraper::Html;

use crate::document::{Document, DocumentFormat};
use crate::strategy::{Strategy, StrategyError, StrategyKind, StrategyOutput};

pub struct NativeReaderStrategy;

impl NativeReaderStrategy {
    pub fn new() -> Self {
        Self
    }

    fn read_json(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| StrategyError::Failed(format!("invalid JSON: {}", e)))?;
        serde_json::to_string_pretty(&value)
            .map_err(|e| StrategyError::Failed(format!("JSON render failed: {}", e)))
    }

    fn read_html(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        let raw = String::from_utf8_lossy(bytes);
        let html = Html::parse_document(&raw);
        let mut out = String::new();
        for node in html.tree.nodes() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            // Skip text inside non-content elements.
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .map(|e| matches!(e.name(), "script" | "style" | "head" | "noscript"))
                    .unwrap_or(false)
            });
            if hidden {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(trimmed);
            }
        }
        Ok(out)
    }

    fn read_docx(&self, bytes: &[u8]) -> Result<String, StrategyError> {
        let cursor = std::io::Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| StrategyError::Failed(format!("not a docx container: {}", e)))?;
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|e| StrategyError::Failed(format!("missing word/document.xml: {}", e)))?
            .read_to_string(&mut xml)?;

        // Paragraph and break boundaries become newlines, every other tag is
        // dropped, then the basic XML entities are decoded.
        let xml = xml
            .replace("</w:p>", "\n")
            .replace("<w:br/>", "\n")
            .replace("<w:tab/>", "\t");
        let tag = Regex::new(r"<[^>]+>").expect("static regex");
        let text = tag.replace_all(&xml, "");
        let text = text
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'");
        Ok(text.trim().to_string())
    }
}

impl Default for NativeReaderStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for NativeReaderStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::NativeReader
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "always available (built in)".to_string()
    }

    fn run(&self, document: &Document) -> Result<StrategyOutput, StrategyError> {
        let text = match document.format() {
            DocumentFormat::Txt
            | DocumentFormat::Csv
            | DocumentFormat::Markdown
            | DocumentFormat::SourceCode => {
                String::from_utf8_lossy(document.bytes()).to_string()
            }
            DocumentFormat::Json => self.read_json(document.bytes())?,
            DocumentFormat::Html => self.read_html(document.bytes())?,
            DocumentFormat::Docx => self.read_docx(document.bytes())?,
            DocumentFormat::Pdf => {
                return Err(StrategyError::Failed(
                    "pdf documents go through the PDF cascade".to_string(),
                ))
            }
        };
        Ok(StrategyOutput {
            text,
            page_count: None,
        })
    }
}
