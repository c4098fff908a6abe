//! Tesseract OCR backend: rasterize pages with `pdftoppm`, recognize text
//! with `tesseract`. The most expensive and most tolerant backend, so it
//! runs last in the cascade.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use tracing::warn;

use crate::document::{Document, DocumentFormat};
use crate::strategy::{Strategy, StrategyError, StrategyKind, StrategyOutput};

use super::{check_binary, check_cmd_status, handle_cmd_output, spill_to_tempfile};

/// Render DPI for rasterization. 300 is the usual sweet spot for tesseract.
const RASTER_DPI: &str = "300";

pub struct TesseractOcrStrategy {
    /// Tesseract language setting (e.g. "eng", "deu").
    language: String,
}

impl TesseractOcrStrategy {
    pub fn new() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }

    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = lang.to_string();
        self
    }

    /// Run tesseract on a single image, writing to stdout.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, StrategyError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        handle_cmd_output(output, "tesseract (install tesseract-ocr)", "tesseract failed")
    }

    /// Convert the PDF to one PNG per page under `dir`.
    fn rasterize(&self, pdf_path: &Path, dir: &Path) -> Result<(), StrategyError> {
        let status = Command::new("pdftoppm")
            .args(["-png", "-r", RASTER_DPI])
            .arg(pdf_path)
            .arg(dir.join("page"))
            .status();

        check_cmd_status(
            status,
            "pdftoppm (install poppler-utils)",
            "pdftoppm failed to convert PDF",
        )
    }
}

impl Default for TesseractOcrStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for TesseractOcrStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TesseractOcr
    }

    fn is_available(&self) -> bool {
        check_binary("tesseract") && check_binary("pdftoppm")
    }

    fn availability_hint(&self) -> String {
        let mut missing = Vec::new();
        if !check_binary("tesseract") {
            missing.push("tesseract (install tesseract-ocr)");
        }
        if !check_binary("pdftoppm") {
            missing.push("pdftoppm (install poppler-utils)");
        }
        if missing.is_empty() {
            "available".to_string()
        } else {
            format!("missing: {}", missing.join(", "))
        }
    }

    fn run(&self, document: &Document) -> Result<StrategyOutput, StrategyError> {
        if document.format() != DocumentFormat::Pdf {
            return Err(StrategyError::Failed(format!(
                "ocr backend only handles pdf, got {}",
                document.format()
            )));
        }

        let file = spill_to_tempfile(document, ".pdf")?;
        let temp_dir = TempDir::new()?;
        self.rasterize(file.path(), temp_dir.path())?;

        // Find all generated images in page order.
        let mut images: Vec<_> = std::fs::read_dir(temp_dir.path())?
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "png")
                    .unwrap_or(false)
            })
            .map(|e| e.path())
            .collect();
        images.sort();

        if images.is_empty() {
            return Err(StrategyError::Failed(
                "no images generated from PDF".to_string(),
            ));
        }

        let mut all_text = String::new();
        for (i, image_path) in images.iter().enumerate() {
            match self.run_tesseract(image_path) {
                Ok(text) => {
                    if !all_text.is_empty() {
                        all_text.push_str("\n\n--- Page ");
                        all_text.push_str(&(i + 1).to_string());
                        all_text.push_str(" ---\n\n");
                    }
                    all_text.push_str(&text);
                }
                Err(e) => {
                    warn!("ocr: page {} failed: {}", i + 1, e);
                }
            }
        }

        Ok(StrategyOutput {
            text: all_text,
            page_count: Some(images.len() as u32),
        })
    }
}
