//! End-to-end extraction tests over real files on disk.
//!
//! These only exercise backends that need no external binaries, so they
//! pass on a bare CI machine: native readers for text formats, and the
//! cascade's failure classification for broken PDFs (where every backend
//! either errors on the malformed input or reports its tool missing).

use std::io::Write;
use std::path::PathBuf;

use docsift::{Chunker, Classification, Config, Document, DocumentFormat, Extractor, StrategyKind};

fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(bytes).unwrap();
    path
}

fn extractor() -> Extractor {
    Extractor::new(Config::default().extraction)
}

#[test]
fn txt_file_extracts_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "notes.txt",
        b"Quarterly revenue grew 12% on strong subscription renewals.",
    );

    let result = extractor().extract_file(&path).unwrap();

    assert_eq!(result.classification, Classification::TextExtracted);
    assert_eq!(result.winning_strategy(), Some(StrategyKind::NativeReader));
    assert!(result.text.contains("subscription renewals"));
    assert_eq!(result.attempts.len(), 1);
}

#[test]
fn json_file_extracts_as_pretty_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "report.json",
        br#"{"quarter":"Q3","revenue_growth_pct":12,"notes":"renewals strong"}"#,
    );

    let result = extractor().extract_file(&path).unwrap();

    assert_eq!(result.classification, Classification::TextExtracted);
    assert!(result.text.contains("\"quarter\": \"Q3\""));
}

#[test]
fn html_file_extracts_visible_text_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "page.html",
        b"<html><head><script>tracking();</script></head>\
          <body><h1>Annual Report</h1><p>Revenue grew twelve percent.</p></body></html>",
    );

    let result = extractor().extract_file(&path).unwrap();

    assert_eq!(result.classification, Classification::TextExtracted);
    assert!(result.text.contains("Annual Report"));
    assert!(!result.text.contains("tracking()"));
}

#[test]
fn unknown_extension_is_unsupported_with_empty_trace() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "binary.exe", b"MZ\x90\x00\x03");

    let result = extractor().extract_file(&path).unwrap();

    assert_eq!(result.classification, Classification::UnsupportedFormat);
    assert!(result.attempts.is_empty());
    assert!(result.text.is_empty());
}

#[test]
fn broken_pdf_with_ocr_disabled_classifies_needs_ocr() {
    let mut config = Config::default();
    config.extraction.ocr_enabled = false;
    let extractor = Extractor::new(config.extraction);

    // Valid header so sniffing says PDF, but no readable body: every
    // non-OCR backend fails, OCR is present in the chain but disabled.
    let doc = Document::from_bytes(b"%PDF-1.4\ngarbage".to_vec(), DocumentFormat::Pdf);
    let result = extractor.extract(&doc);

    assert_eq!(result.classification, Classification::NeedsOcr);
    assert!(result.text.is_empty());
    // pdftotext and lopdf were both attempted; skipped OCR is not recorded.
    assert_eq!(result.attempts.len(), 2);
}

#[test]
fn broken_pdf_with_ocr_enabled_classifies_unreadable() {
    let doc = Document::from_bytes(b"%PDF-1.4\ngarbage".to_vec(), DocumentFormat::Pdf);
    let result = extractor().extract(&doc);

    // With OCR enabled, every configured backend gets its attempt (running
    // and failing on the malformed input, or reporting its tool missing),
    // so the terminal classification is unreadable rather than needs-OCR.
    assert_eq!(result.classification, Classification::Unreadable);
    assert_eq!(result.attempts.len(), 3);
    assert!(result.attempts.iter().all(|a| a.detail.is_some()));
}

#[test]
fn extracted_text_chunks_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    let body = "Revenue grew twelve percent in the third quarter. \
                Subscription renewals were the main driver. \
                Churn fell for the fourth consecutive quarter."
        .repeat(3);
    let path = write_file(&dir, "summary.txt", body.as_bytes());

    let result = extractor().extract_file(&path).unwrap();
    assert!(result.is_success());

    let config = Config::default();
    let chunker = Chunker::new(config.chunking);
    let first = chunker.split(&result.text);
    let second = chunker.split(&result.text);

    assert!(!first.is_empty());
    assert_eq!(first, second);
    for chunk in &first {
        assert_eq!(
            &result.text[chunk.offset..chunk.offset + chunk.text.len()],
            chunk.text
        );
    }
}

#[test]
fn rerunning_extraction_yields_identical_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "stable.md",
        b"# Heading\n\nThe same input must always produce the same output.",
    );

    let ex = extractor();
    let first = ex.extract_file(&path).unwrap();
    let second = ex.extract_file(&path).unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.classification, second.classification);
    assert_eq!(first.attempts.len(), second.attempts.len());
}
