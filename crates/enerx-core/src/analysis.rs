//! Aggregation of extracted records into monthly and batch-level views.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::analysis::{MonthlyAnalysis, ProcessingSummary};
use crate::models::invoice::{InvoiceRecord, RecordStatus};

/// Monthly consumption per site code.
///
/// Only OK records with an end date contribute. Sites appear in the order
/// they are first seen and keep the site name of their first record.
pub fn monthly_analysis(records: &[InvoiceRecord]) -> Vec<MonthlyAnalysis> {
    let mut sites: Vec<MonthlyAnalysis> = Vec::new();

    for record in records.iter().filter(|r| r.is_ok()) {
        let Some(month) = record.month() else {
            continue;
        };

        let index = match sites.iter().position(|s| s.site_code == record.site_code) {
            Some(index) => index,
            None => {
                sites.push(MonthlyAnalysis {
                    site_code: record.site_code.clone(),
                    site_name: record.site_name.clone(),
                    monthly_data: BTreeMap::new(),
                    total_year: 0,
                    monthly_average: 0,
                });
                sites.len() - 1
            }
        };

        *sites[index]
            .monthly_data
            .entry(month.to_string())
            .or_insert(0) += record.consumption_kwh;
    }

    for site in &mut sites {
        site.total_year = site.monthly_data.values().sum();
        site.monthly_average = rounded_mean(site.total_year, site.monthly_data.len() as u64);
    }

    debug!(sites = sites.len(), "monthly analysis");
    sites
}

/// Status tallies for a batch.
pub fn processing_summary(records: &[InvoiceRecord], date: NaiveDate) -> ProcessingSummary {
    let count = |status: RecordStatus| records.iter().filter(|r| r.status == status).count();

    ProcessingSummary {
        total_records: records.len(),
        successful_records: count(RecordStatus::Ok),
        incomplete_records: count(RecordStatus::Incomplete),
        error_records: count(RecordStatus::Error),
        processing_date: date.format("%Y-%m-%d").to_string(),
    }
}

/// Mean rounded half up; zero for no months.
fn rounded_mean(total: u64, months: u64) -> u64 {
    if months == 0 {
        return 0;
    }
    (2 * total + months) / (2 * months)
}
