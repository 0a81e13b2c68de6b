//! Error types for the enerx-core library.
//!
//! Field extraction never fails; these errors only describe problems with
//! acquiring document text or loading configuration.

use thiserror::Error;

/// Main error type for the enerx library.
#[derive(Error, Debug)]
pub enum EnerxError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text acquisition.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF holds scanned pages only and would need OCR.
    #[error("PDF contains only {chars} characters of text (image-based document, OCR not available)")]
    ImageOnly { chars: usize },

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Result type for the enerx library.
pub type Result<T> = std::result::Result<T, EnerxError>;
