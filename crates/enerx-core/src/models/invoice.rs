//! Invoice record model produced by the extraction engine.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label used when no consumption source phrase was found.
pub const NO_SOURCE_LINE: &str = "N/A";

/// One row of extracted billing data: one site and one sub-period of one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Generated unique identifier.
    pub id: String,

    /// Origin document identifier (shared by all records of one document).
    pub file_name: String,

    /// Canonical supplier tag.
    pub supplier: Supplier,

    /// Invoice number/identifier, empty when unknown.
    pub invoice_number: String,

    /// Issue date, ISO `YYYY-MM-DD` or empty.
    pub issue_date: String,

    /// Client (account holder) name.
    pub client_name: String,

    /// Site (consumption location) name.
    pub site_name: String,

    /// Site code (NLC or ELECTEL, depending on supplier).
    pub site_code: String,

    /// Metering-point code (POD).
    pub meter_point_code: String,

    /// Postal address of the site.
    pub address: String,

    /// Billing window start, ISO or empty.
    pub start_date: String,

    /// Billing window end, ISO or empty.
    pub end_date: String,

    /// Consumption in kWh; zero means not found.
    pub consumption_kwh: u64,

    /// Label of the phrase the consumption was read from.
    pub source_line: String,

    /// Total payment in RON; zero means not found.
    pub total_payment: Decimal,

    /// Date the record was assembled.
    pub processing_date: String,

    /// Link to the source document, filled in by export tooling.
    pub document_link: String,

    /// Completeness status derived from the other fields.
    pub status: RecordStatus,

    /// Explanation of any incompleteness.
    pub observations: String,
}

impl InvoiceRecord {
    /// Month key (`YYYY-MM`) derived from the end date, if present.
    pub fn month(&self) -> Option<&str> {
        self.end_date.get(0..7)
    }

    /// Check whether the record carries usable data.
    pub fn is_ok(&self) -> bool {
        self.status == RecordStatus::Ok
    }
}

/// Record completeness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordStatus {
    /// All required fields present.
    Ok,
    /// Supplier recognised but one or more required fields absent.
    Incomplete,
    /// Supplier unknown or document text could not be acquired.
    Error,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Ok => "OK",
            RecordStatus::Incomplete => "INCOMPLETE",
            RecordStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Electricity suppliers recognised by the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supplier {
    #[serde(rename = "PPC ENERGIE")]
    PpcEnergie,
    #[serde(rename = "ELECTRICA")]
    Electrica,
    #[serde(rename = "PREMIER ENERGY")]
    PremierEnergy,
    #[serde(rename = "CEZ VÂNZARE")]
    CezVanzare,
    #[serde(rename = "ENEL ENERGIE")]
    EnelEnergie,
    #[serde(rename = "E.ON")]
    Eon,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl Supplier {
    /// All supplier tags, in classification order.
    pub const ALL: [Supplier; 7] = [
        Supplier::PpcEnergie,
        Supplier::Electrica,
        Supplier::PremierEnergy,
        Supplier::CezVanzare,
        Supplier::EnelEnergie,
        Supplier::Eon,
        Supplier::Unknown,
    ];

    /// Canonical tag as printed in reports.
    pub fn tag(&self) -> &'static str {
        match self {
            Supplier::PpcEnergie => "PPC ENERGIE",
            Supplier::Electrica => "ELECTRICA",
            Supplier::PremierEnergy => "PREMIER ENERGY",
            Supplier::CezVanzare => "CEZ VÂNZARE",
            Supplier::EnelEnergie => "ENEL ENERGIE",
            Supplier::Eon => "E.ON",
            Supplier::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Supplier::Unknown)
    }
}

impl fmt::Display for Supplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_serializes_as_tag() {
        let json = serde_json::to_string(&Supplier::CezVanzare).unwrap();
        assert_eq!(json, "\"CEZ VÂNZARE\"");
        let back: Supplier = serde_json::from_str("\"unknown\"").unwrap();
        assert_eq!(back, Supplier::Unknown);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RecordStatus::Incomplete).unwrap(), "\"INCOMPLETE\"");
        assert_eq!(RecordStatus::Ok.to_string(), "OK");
    }

    #[test]
    fn test_every_tag_is_distinct() {
        let mut tags: Vec<_> = Supplier::ALL.iter().map(|s| s.tag()).collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), Supplier::ALL.len());
    }
}
