//! Concrete extraction backends.

mod lopdf_text;
mod native;
mod ocr;
mod pdf_metadata;
mod pdftotext;

pub use lopdf_text::LopdfTextStrategy;
pub use native::NativeReaderStrategy;
pub use ocr::TesseractOcrStrategy;
pub use pdf_metadata::PdfMetadataStrategy;
pub use pdftotext::PdfToTextStrategy;

use std::io::Write;

use tempfile::NamedTempFile;

use crate::document::Document;
use crate::strategy::StrategyError;

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// External tools the command-line backends shell out to.
pub const EXTERNAL_TOOLS: &[&str] = &["pdftotext", "pdfinfo", "pdftoppm", "tesseract"];

/// Write document bytes to a named temporary file so command-line tools can
/// read them. The file is deleted when the handle drops.
pub(crate) fn spill_to_tempfile(
    document: &Document,
    suffix: &str,
) -> Result<NamedTempFile, StrategyError> {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile()?;
    file.write_all(document.bytes())?;
    file.flush()?;
    Ok(file)
}

/// Handle command output, extracting stdout on success or returning the
/// appropriate error.
pub(crate) fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, StrategyError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(StrategyError::Failed(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StrategyError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(StrategyError::Io(e)),
    }
}

/// Check command status, returning the appropriate error on failure.
pub(crate) fn check_cmd_status(
    result: std::io::Result<std::process::ExitStatus>,
    tool_name: &str,
    error_msg: &str,
) -> Result<(), StrategyError> {
    match result {
        Ok(s) if s.success() => Ok(()),
        Ok(_) => Err(StrategyError::Failed(error_msg.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StrategyError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(StrategyError::Io(e)),
    }
}
