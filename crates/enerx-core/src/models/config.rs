//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{EnerxError, Result};

/// Main configuration for the enerx pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnerxConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF text acquisition configuration.
    pub pdf: PdfConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,

    /// Report export configuration.
    pub export: ExportConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Consumption values at or above this are rejected as implausible.
    pub max_consumption_kwh: u64,

    /// Skip the first page of multi-page, multi-site documents when segmenting.
    pub detect_cover_page: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_consumption_kwh: 10_000_000,
            detect_cover_page: true,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum characters of real text for a PDF to count as text-based.
    pub min_text_length: usize,

    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 100,
            max_pages: 0,
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of documents processed concurrently.
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { jobs: 4 }
    }
}

/// Report export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Client name used in report file names.
    pub client_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            client_name: "Client".to_string(),
        }
    }
}

impl EnerxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| EnerxError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| EnerxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: EnerxConfig =
            serde_json::from_str(r#"{ "batch": { "jobs": 8 } }"#).unwrap();
        assert_eq!(config.batch.jobs, 8);
        assert_eq!(config.extraction.max_consumption_kwh, 10_000_000);
        assert!(config.extraction.detect_cover_page);
        assert_eq!(config.export.client_name, "Client");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = std::env::temp_dir().join(format!("enerx-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = EnerxConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, EnerxError::Config(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
