//! The extraction cascade: try each configured strategy in order, record
//! every attempt, classify the outcome.
//!
//! No error escapes this module. Backend failures become data in the
//! attempt trace and the cascade moves on; the caller gets a single
//! [`ExtractionResult`] whatever happens.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ExtractionConfig;
use crate::document::{Document, DocumentFormat};
use crate::strategy::{build_chain, Strategy, StrategyKind};
use crate::strategies::NativeReaderStrategy;

/// Outcome of a single strategy invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptOutcome {
    /// Usable text produced.
    Success,
    /// Backend ran but produced text below the usable-length floor.
    Empty,
    /// Backend returned an error.
    Error,
}

/// Record of one strategy invocation. Immutable once appended to the trace.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionAttempt {
    /// Which strategy ran.
    pub strategy: StrategyKind,
    /// How the invocation ended.
    pub outcome: AttemptOutcome,
    /// Non-whitespace characters extracted (0 on error).
    pub chars: usize,
    /// Diagnostic message for failed or empty attempts.
    pub detail: Option<String>,
}

/// Terminal classification of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// A strategy produced usable text.
    TextExtracted,
    /// Nothing worked, but an OCR strategy exists and was disabled; OCR
    /// would likely help.
    NeedsOcr,
    /// Every configured strategy failed and no further fallback exists.
    Unreadable,
    /// The format tag is outside the supported set; nothing was attempted.
    UnsupportedFormat,
}

/// Terminal outcome of one extraction run over one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Final text. Empty unless classified `TextExtracted`.
    pub text: String,
    /// How the run ended.
    pub classification: Classification,
    /// Every strategy invocation, in the order attempted.
    pub attempts: Vec<ExtractionAttempt>,
    /// Page count reported by the winning strategy, when known.
    pub page_count: Option<u32>,
}

impl ExtractionResult {
    fn unsupported() -> Self {
        Self {
            text: String::new(),
            classification: Classification::UnsupportedFormat,
            attempts: Vec::new(),
            page_count: None,
        }
    }

    /// The strategy that produced the final text, if any.
    pub fn winning_strategy(&self) -> Option<StrategyKind> {
        self.attempts
            .iter()
            .find(|a| a.outcome == AttemptOutcome::Success)
            .map(|a| a.strategy)
    }

    /// Whether the final text came from an OCR backend. Callers branch UX
    /// on this (OCR output is noisier than a real text layer).
    pub fn used_ocr(&self) -> bool {
        self.winning_strategy().map(|k| k.is_ocr()).unwrap_or(false)
    }

    pub fn is_success(&self) -> bool {
        self.classification == Classification::TextExtracted
    }
}

/// Count characters that carry content. The usable-length floor is measured
/// over this, so near-blank pages full of whitespace don't count as success.
fn content_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Run the cascade over one document.
///
/// Strategies run in declared order, each to completion, until one yields
/// text at or above `min_chars` non-whitespace characters. OCR strategies
/// are skipped (and left out of the trace) when `ocr_enabled` is false;
/// their presence still matters for the terminal classification.
pub fn run_cascade(
    document: &Document,
    strategies: &[Box<dyn Strategy>],
    ocr_enabled: bool,
    min_chars: usize,
) -> ExtractionResult {
    // Config validation rejects a zero floor, but callers can construct the
    // config directly; a floor of zero would let whitespace-only output
    // classify as extracted text.
    let min_chars = min_chars.max(1);
    let mut attempts: Vec<ExtractionAttempt> = Vec::with_capacity(strategies.len());
    let mut ocr_skipped = false;

    for strategy in strategies {
        if strategy.is_ocr() && !ocr_enabled {
            debug!("cascade: {} skipped (OCR disabled)", strategy.kind());
            ocr_skipped = true;
            continue;
        }

        match strategy.run(document) {
            Ok(output) => {
                let chars = content_chars(&output.text);
                if chars >= min_chars {
                    debug!(
                        "cascade: {} succeeded ({} content chars)",
                        strategy.kind(),
                        chars
                    );
                    attempts.push(ExtractionAttempt {
                        strategy: strategy.kind(),
                        outcome: AttemptOutcome::Success,
                        chars,
                        detail: None,
                    });
                    return ExtractionResult {
                        text: output.text,
                        classification: Classification::TextExtracted,
                        attempts,
                        page_count: output.page_count,
                    };
                }
                debug!(
                    "cascade: {} returned {} content chars, below floor of {}",
                    strategy.kind(),
                    chars,
                    min_chars
                );
                attempts.push(ExtractionAttempt {
                    strategy: strategy.kind(),
                    outcome: AttemptOutcome::Empty,
                    chars,
                    detail: Some(format!(
                        "{} content chars, below floor of {}",
                        chars, min_chars
                    )),
                });
            }
            Err(e) => {
                warn!("cascade: {} failed: {}", strategy.kind(), e);
                attempts.push(ExtractionAttempt {
                    strategy: strategy.kind(),
                    outcome: AttemptOutcome::Error,
                    chars: 0,
                    detail: Some(e.to_string()),
                });
            }
        }
    }

    let classification = if ocr_skipped {
        Classification::NeedsOcr
    } else {
        Classification::Unreadable
    };
    ExtractionResult {
        text: String::new(),
        classification,
        attempts,
        page_count: None,
    }
}

/// High-level entry point: owns the configuration, picks the strategy list
/// per format, and runs the cascade.
///
/// One invocation per document; invocations share no mutable state, so
/// callers are free to run many documents concurrently.
pub struct Extractor {
    config: ExtractionConfig,
}

impl Extractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract from an in-memory document.
    pub fn extract(&self, document: &Document) -> ExtractionResult {
        let chain: Vec<Box<dyn Strategy>> = match document.format() {
            DocumentFormat::Pdf => build_chain(&self.config.strategies, &self.config),
            _ => vec![Box::new(NativeReaderStrategy::new())],
        };

        let digest = document.digest();
        info!(
            format = %document.format(),
            size = document.len(),
            digest = %&digest[..12],
            strategies = chain.len(),
            "extracting document"
        );

        let result = run_cascade(document, &chain, self.config.ocr_enabled, self.config.min_chars);

        match result.classification {
            Classification::TextExtracted => info!(
                strategy = %result.winning_strategy().map(|k| k.as_str()).unwrap_or("?"),
                chars = result.text.len(),
                "extraction succeeded"
            ),
            other => warn!(classification = ?other, attempts = result.attempts.len(), "extraction failed"),
        }
        result
    }

    /// Extract from raw bytes with a caller-declared format tag. An
    /// unrecognized tag short-circuits to `UNSUPPORTED_FORMAT` with an
    /// empty trace; no strategy is invoked.
    pub fn extract_bytes(&self, bytes: Vec<u8>, format_tag: &str) -> ExtractionResult {
        match DocumentFormat::from_tag(format_tag) {
            Some(format) => self.extract(&Document::from_bytes(bytes, format)),
            None => {
                warn!("unsupported format tag '{}'", format_tag);
                ExtractionResult::unsupported()
            }
        }
    }

    /// Extract from a file on disk. Only I/O errors surface as `Err`; an
    /// unsupported format is a classification, not an error.
    pub fn extract_file(&self, path: &Path) -> std::io::Result<ExtractionResult> {
        match Document::from_path(path)? {
            Some(document) => Ok(self.extract(&document)),
            None => {
                warn!("unsupported file: {}", path.display());
                Ok(ExtractionResult::unsupported())
            }
        }
    }
}
