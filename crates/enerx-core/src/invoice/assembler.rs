//! Record assembly and completeness classification.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::ids::IdSource;
use super::rules::DateRange;
use crate::models::invoice::{InvoiceRecord, RecordStatus, Supplier, NO_SOURCE_LINE};

/// Field values extracted for one record.
#[derive(Debug, Clone, Default)]
pub struct RecordFields {
    pub file_name: String,
    pub supplier: Supplier,
    pub invoice_number: String,
    pub issue_date: String,
    pub client_name: String,
    pub site_name: String,
    pub site_code: String,
    pub meter_point_code: String,
    pub address: String,
    pub period: DateRange,
    pub consumption_kwh: u64,
    pub source_line: String,
    pub total_payment: Decimal,
}

/// Builds records, stamping ids and the processing date.
pub struct Assembler<'a> {
    ids: &'a dyn IdSource,
    processing_date: NaiveDate,
}

impl<'a> Assembler<'a> {
    pub fn new(ids: &'a dyn IdSource, processing_date: NaiveDate) -> Self {
        Self {
            ids,
            processing_date,
        }
    }

    /// Assemble a record and derive its status.
    ///
    /// Missing invoice number, issue date, site code, billing period or a
    /// zero total make the record INCOMPLETE. An unknown supplier makes it
    /// ERROR regardless. A reversed billing period counts as missing.
    pub fn assemble(&self, fields: RecordFields) -> InvoiceRecord {
        let supplier = fields.supplier;
        let period = if fields.period.is_ordered() {
            fields.period
        } else {
            DateRange::default()
        };

        let mut missing: Vec<&str> = Vec::new();
        if fields.invoice_number.is_empty() {
            missing.push("invoice number");
        }
        if fields.issue_date.is_empty() {
            missing.push("issue date");
        }
        if fields.site_code.is_empty() {
            missing.push("site code");
        }
        if !period.is_complete() {
            missing.push("billing period");
        }
        if fields.total_payment.is_zero() {
            missing.push("total payment");
        }

        let mut status = if missing.is_empty() {
            RecordStatus::Ok
        } else {
            RecordStatus::Incomplete
        };
        if supplier.is_unknown() {
            status = RecordStatus::Error;
            missing.insert(0, "unknown supplier");
        }

        let observations = if missing.is_empty() {
            String::new()
        } else {
            format!("incomplete data: {}", missing.join(", "))
        };

        debug!(
            file = %fields.file_name,
            site_code = %fields.site_code,
            status = %status,
            "assembled record"
        );

        let source_line = if fields.source_line.is_empty() {
            NO_SOURCE_LINE.to_string()
        } else {
            fields.source_line
        };

        InvoiceRecord {
            id: self.ids.next_id(),
            file_name: fields.file_name,
            supplier,
            invoice_number: fields.invoice_number,
            issue_date: fields.issue_date,
            client_name: fields.client_name,
            site_name: fields.site_name,
            site_code: fields.site_code,
            meter_point_code: fields.meter_point_code,
            address: fields.address,
            start_date: period.start_date,
            end_date: period.end_date,
            consumption_kwh: fields.consumption_kwh,
            source_line,
            total_payment: fields.total_payment.round_dp(2),
            processing_date: self.processing_date.format("%Y-%m-%d").to_string(),
            document_link: String::new(),
            status,
            observations,
        }
    }

    /// An ERROR record for a document whose text could not be acquired.
    pub fn failure(&self, file_name: &str, reason: &str) -> InvoiceRecord {
        let mut record = self.assemble(RecordFields {
            file_name: file_name.to_string(),
            supplier: Supplier::Unknown,
            ..RecordFields::default()
        });
        record.observations = reason.to_string();
        record
    }
}
