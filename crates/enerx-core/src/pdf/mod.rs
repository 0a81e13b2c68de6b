//! PDF text acquisition.

mod extractor;

pub use extractor::{PdfContent, PdfExtractor, PdfPage};

use tracing::{debug, warn};

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Type of PDF content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    /// Contains extractable text.
    Text,
    /// Contains only images (scanned document).
    Image,
    /// Contains both text and images.
    Hybrid,
    /// Empty or unreadable.
    Empty,
}

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

/// Load a PDF and return its text with pages separated by page-break markers.
///
/// Fails with [`PdfError::ImageOnly`] when the document carries fewer than
/// `config.min_text_length` characters of real text.
pub fn acquire_text(data: &[u8], config: &PdfConfig) -> Result<String> {
    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;

    let content = extractor.extract_all(config.max_pages)?;
    let chars = content.text_chars();
    debug!(
        pages = content.pages.len(),
        chars,
        pdf_type = ?content.pdf_type,
        "acquired PDF text"
    );

    if chars < config.min_text_length {
        warn!(chars, min = config.min_text_length, "PDF has too little text");
        return Err(PdfError::ImageOnly { chars });
    }
    Ok(content.text)
}
