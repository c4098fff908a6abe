//! docsift - multi-strategy document text extraction with cascading fallback.
//!
//! Given a document and an ordered list of extraction backends, tries each
//! backend in priority order until one yields usable text, and classifies
//! the document as text-based, scanned (needs OCR), or unreadable. Every
//! attempt is recorded in a trace so callers can surface actionable
//! diagnostics ("all strategies failed, install tesseract") instead of a
//! bare error.
//!
//! The cheap, reliable backends run first (poppler's pdftotext, then pure
//! Rust lopdf extraction); OCR runs last because rasterizing and
//! recognizing every page is orders of magnitude slower. Non-PDF formats
//! (txt, csv, json, html, markdown, docx, source code) have a single
//! direct reader each.
//!
//! Extraction is synchronous and single-threaded per document. Callers may
//! process many documents concurrently; invocations share nothing mutable.

pub mod chunk;
pub mod config;
pub mod document;
pub mod pipeline;
pub mod strategies;
pub mod strategy;

pub use chunk::{Chunk, Chunker};
pub use config::{ChunkConfig, Config, ConfigError, ExtractionConfig};
pub use document::{Document, DocumentFormat};
pub use pipeline::{
    run_cascade, AttemptOutcome, Classification, ExtractionAttempt, ExtractionResult, Extractor,
};
pub use strategy::{
    build_chain, create_strategy, Strategy, StrategyError, StrategyKind, StrategyOutput,
};
