//! Extraction strategy abstraction.
//!
//! Each strategy is one backend attempted in a fixed priority order:
//! - PdfToText: poppler `pdftotext` via command line
//! - LopdfText: pure Rust extraction with the lopdf crate
//! - PdfMetadata: last-resort metadata and structure dump
//! - TesseractOcr: rasterize with `pdftoppm`, recognize with `tesseract`
//! - NativeReader: direct readers for non-PDF formats
//!
//! Strategies are stateless, never mutate the document, and do only local
//! CPU- or I/O-bound work. The cascade in [`crate::pipeline`] decides which
//! to run and in what order.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::ExtractionConfig;
use crate::document::Document;
use crate::strategies::{
    LopdfTextStrategy, NativeReaderStrategy, PdfMetadataStrategy, PdfToTextStrategy,
    TesseractOcrStrategy,
};

/// Errors a single strategy invocation can produce.
///
/// These never cross the pipeline boundary: the cascade records them in the
/// attempt trace and moves on to the next strategy.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text produced by one successful strategy invocation.
#[derive(Debug, Clone)]
pub struct StrategyOutput {
    /// Extracted text content.
    pub text: String,
    /// Number of pages processed, when the backend can tell.
    pub page_count: Option<u32>,
}

/// The fixed set of known strategy kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    PdfToText,
    LopdfText,
    PdfMetadata,
    TesseractOcr,
    NativeReader,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::PdfToText => "pdftotext",
            StrategyKind::LopdfText => "lopdf",
            StrategyKind::PdfMetadata => "metadata",
            StrategyKind::TesseractOcr => "ocr",
            StrategyKind::NativeReader => "native",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pdftotext" | "poppler" => Some(StrategyKind::PdfToText),
            "lopdf" => Some(StrategyKind::LopdfText),
            "metadata" => Some(StrategyKind::PdfMetadata),
            "ocr" | "tesseract" => Some(StrategyKind::TesseractOcr),
            "native" => Some(StrategyKind::NativeReader),
            _ => None,
        }
    }

    /// Whether this kind rasterizes pages and recognizes text from images.
    pub fn is_ocr(&self) -> bool {
        matches!(self, StrategyKind::TesseractOcr)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for extraction strategies. Uniform invocation signature across all
/// backends so the cascade can treat them interchangeably.
pub trait Strategy: Send + Sync {
    /// Which kind of strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Whether this strategy is OCR-based (rasterize + recognize).
    fn is_ocr(&self) -> bool {
        self.kind().is_ocr()
    }

    /// Check if this strategy can actually run (tools installed, etc.).
    fn is_available(&self) -> bool;

    /// What is needed to make this strategy available.
    fn availability_hint(&self) -> String;

    /// Attempt extraction. Must not mutate the document.
    fn run(&self, document: &Document) -> Result<StrategyOutput, StrategyError>;
}

/// Build a strategy from a configured name. Unknown names yield `None`.
pub fn create_strategy(name: &str, config: &ExtractionConfig) -> Option<Box<dyn Strategy>> {
    let kind = StrategyKind::from_str(name)?;
    Some(match kind {
        StrategyKind::PdfToText => Box::new(PdfToTextStrategy::new()),
        StrategyKind::LopdfText => Box::new(LopdfTextStrategy::new()),
        StrategyKind::PdfMetadata => Box::new(PdfMetadataStrategy::new()),
        StrategyKind::TesseractOcr => {
            Box::new(TesseractOcrStrategy::new().with_language(&config.ocr_language))
        }
        StrategyKind::NativeReader => Box::new(NativeReaderStrategy::new()),
    })
}

/// Build the configured cascade. Unknown names are skipped with a warning,
/// never fatal: a typo in one entry should not take down the whole chain.
pub fn build_chain(names: &[String], config: &ExtractionConfig) -> Vec<Box<dyn Strategy>> {
    let mut chain: Vec<Box<dyn Strategy>> = Vec::with_capacity(names.len());
    for name in names {
        match create_strategy(name, config) {
            Some(strategy) => chain.push(strategy),
            None => warn!("extraction chain: unknown strategy '{}', skipping", name),
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in [
            StrategyKind::PdfToText,
            StrategyKind::LopdfText,
            StrategyKind::PdfMetadata,
            StrategyKind::TesseractOcr,
            StrategyKind::NativeReader,
        ] {
            assert_eq!(StrategyKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn only_tesseract_is_ocr() {
        assert!(StrategyKind::TesseractOcr.is_ocr());
        assert!(!StrategyKind::PdfToText.is_ocr());
        assert!(!StrategyKind::LopdfText.is_ocr());
        assert!(!StrategyKind::PdfMetadata.is_ocr());
        assert!(!StrategyKind::NativeReader.is_ocr());
    }

    #[test]
    fn unknown_names_are_skipped() {
        let config = ExtractionConfig::default();
        let names = vec![
            "pdftotext".to_string(),
            "no_such_backend".to_string(),
            "ocr".to_string(),
        ];
        let chain = build_chain(&names, &config);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].kind(), StrategyKind::PdfToText);
        assert_eq!(chain[1].kind(), StrategyKind::TesseractOcr);
    }

    #[test]
    fn chain_preserves_configured_order() {
        let config = ExtractionConfig::default();
        let names = vec![
            "lopdf".to_string(),
            "metadata".to_string(),
            "pdftotext".to_string(),
        ];
        let chain = build_chain(&names, &config);
        let kinds: Vec<_> = chain.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::LopdfText,
                StrategyKind::PdfMetadata,
                StrategyKind::PdfToText,
            ]
        );
    }
}
