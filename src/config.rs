//! Configuration for the extraction pipeline and the chunking collaborator.
//!
//! Loaded from a TOML file and passed explicitly into [`crate::Extractor`]
//! and [`crate::chunk::Chunker`]. Nothing in the library reads ambient
//! state; the binary loads `.env` before constructing this.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::StrategyKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_strategies() -> Vec<String> {
    vec![
        "pdftotext".to_string(),
        "lopdf".to_string(),
        "ocr".to_string(),
    ]
}

fn default_ocr_enabled() -> bool {
    true
}

/// Minimum non-whitespace characters for extracted text to count as usable.
/// Prevents false success on near-blank pages.
fn default_min_chars() -> usize {
    20
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_chunk_size() -> usize {
    300
}

fn default_chunk_overlap() -> usize {
    50
}

/// Extraction pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Ordered strategy names for the PDF cascade. Cheapest and most
    /// reliable first, OCR last. Unknown names are skipped.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<String>,

    /// Whether OCR backends may run. When false, OCR strategies in the
    /// chain are skipped and a total failure classifies as NEEDS_OCR.
    #[serde(default = "default_ocr_enabled")]
    pub ocr_enabled: bool,

    /// Usable-length floor, in non-whitespace characters.
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// Tesseract language setting.
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            ocr_enabled: default_ocr_enabled(),
            min_chars: default_min_chars(),
            ocr_language: default_ocr_language(),
        }
    }
}

/// Settings for the downstream chunking collaborator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Target chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub size: usize,

    /// Characters of overlap between neighboring chunks.
    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            size: default_chunk_size(),
            overlap: default_chunk_overlap(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,

    #[serde(default)]
    pub chunking: ChunkConfig,
}

impl Config {
    /// Load from a TOML file, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunking.size == 0 {
            return Err(ConfigError::Invalid("chunking.size must be > 0".into()));
        }
        if self.chunking.overlap >= self.chunking.size {
            return Err(ConfigError::Invalid(format!(
                "chunking.overlap ({}) must be smaller than chunking.size ({})",
                self.chunking.overlap, self.chunking.size
            )));
        }
        if self.extraction.min_chars == 0 {
            // A floor of zero would classify whitespace-only output as
            // extracted text.
            return Err(ConfigError::Invalid(
                "extraction.min_chars must be > 0".into(),
            ));
        }
        if self.extraction.strategies.is_empty() {
            return Err(ConfigError::Invalid(
                "extraction.strategies must not be empty".into(),
            ));
        }
        // Unknown names are skipped at chain build, so a list of nothing
        // but typos would silently run zero strategies.
        if !self
            .extraction
            .strategies
            .iter()
            .any(|s| StrategyKind::from_str(s).is_some())
        {
            return Err(ConfigError::Invalid(format!(
                "extraction.strategies contains no recognized strategy name: {:?}",
                self.extraction.strategies
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(
            config.extraction.strategies,
            vec!["pdftotext", "lopdf", "ocr"]
        );
        assert!(config.extraction.ocr_enabled);
        assert_eq!(config.chunking.size, 300);
        assert_eq!(config.chunking.overlap, 50);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[extraction]\nstrategies = [\"lopdf\", \"metadata\"]\nocr_enabled = false"
        )
        .unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.extraction.strategies, vec!["lopdf", "metadata"]);
        assert!(!config.extraction.ocr_enabled);
        assert_eq!(config.extraction.min_chars, 20);
        assert_eq!(config.chunking.size, 300);
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        let mut config = Config::default();
        config.chunking.overlap = config.chunking.size;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn empty_strategy_list_is_rejected() {
        let mut config = Config::default();
        config.extraction.strategies.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_min_chars_is_rejected() {
        let mut config = Config::default();
        config.extraction.min_chars = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn strategy_list_of_only_unknown_names_is_rejected() {
        let mut config = Config::default();
        config.extraction.strategies = vec!["no_such_backend".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn strategy_list_with_one_recognized_name_passes() {
        let mut config = Config::default();
        config.extraction.strategies =
            vec!["typo_backend".to_string(), "lopdf".to_string()];
        config.validate().unwrap();
    }
}
