//! Aggregate views built from extracted invoice records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Monthly consumption for one site code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAnalysis {
    pub site_code: String,
    pub site_name: String,
    /// `YYYY-MM` to kWh.
    pub monthly_data: BTreeMap<String, u64>,
    pub total_year: u64,
    pub monthly_average: u64,
}

/// Status tallies over a batch of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingSummary {
    pub total_records: usize,
    pub successful_records: usize,
    pub incomplete_records: usize,
    pub error_records: usize,
    pub processing_date: String,
}
