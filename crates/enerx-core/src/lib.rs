//! Core library for Romanian electricity invoice extraction.
//!
//! This crate provides:
//! - PDF text acquisition (lopdf with a pdf-extract fallback)
//! - Supplier classification and per-site segmentation
//! - Rule-cascade field extraction for the ELECTRICA and PPC layouts
//! - Record assembly with completeness status
//! - Monthly consumption aggregation

pub mod analysis;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;

pub use analysis::{monthly_analysis, processing_summary};
pub use error::{EnerxError, PdfError, Result};
pub use invoice::{classify, IdSource, InvoiceParser, SequentialIds, UuidIds};
pub use models::analysis::{MonthlyAnalysis, ProcessingSummary};
pub use models::config::{BatchConfig, EnerxConfig, ExportConfig, ExtractionConfig, PdfConfig};
pub use models::invoice::{InvoiceRecord, RecordStatus, Supplier, NO_SOURCE_LINE};
pub use pdf::{acquire_text, PdfContent, PdfExtractor, PdfProcessor, PdfType};
