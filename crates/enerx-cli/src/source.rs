//! Reading document text from input files.

use std::fs;
use std::path::Path;

use anyhow::Context;

use enerx_core::{acquire_text, PdfConfig};

/// Extensions accepted as invoice documents.
const SUPPORTED: [&str; 2] = ["pdf", "txt"];

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED.contains(&extension(path).as_str())
}

/// Name recorded as the origin of a document's records.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string()
}

/// Text of a `.pdf` (page-break separated) or `.txt` (verbatim) file.
pub fn load_text(path: &Path, config: &PdfConfig) -> anyhow::Result<String> {
    match extension(path).as_str() {
        "pdf" => {
            let data = fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(acquire_text(&data, config)?)
        }
        "txt" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}
