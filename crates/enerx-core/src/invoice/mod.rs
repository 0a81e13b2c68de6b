//! Invoice text to record extraction.
//!
//! The pipeline classifies the supplier, picks its layout family, finds the
//! site codes, cuts the text into per-site segments and assembles one record
//! per site (or per metered sub-period).

pub mod assembler;
pub mod classifier;
pub mod ids;
mod parser;
pub mod rules;
pub mod segmenter;
pub mod suppliers;

pub use classifier::classify;
pub use ids::{IdSource, SequentialIds, UuidIds};
pub use parser::InvoiceParser;
pub use segmenter::{Segment, PAGE_SEPARATOR};
pub use suppliers::{family_for, AddressScope, SupplierFamily};
