//! Per-supplier field extraction.
//!
//! Each supplier layout family implements [`SupplierFamily`]. Every method
//! is total: a field that cannot be found comes back empty (or zero).

mod electrica;
pub mod generic;
mod ppc;

pub use electrica::ElectricaFamily;
pub use ppc::PpcFamily;

use regex::Regex;
use rust_decimal::Decimal;

use super::rules::{normalize_amount, normalize_number, DateRange, ExtractionMatch};
use super::segmenter::SegmentationProfile;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::Supplier;

/// Which addresses an address cascade may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    /// Whole document without site codes: client addresses only.
    Document,
    /// One site segment: the site's own address is preferred.
    Site,
}

/// One metered sub-period inside a site section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumptionPeriod {
    pub period: DateRange,
    /// Measured quantity in kWh.
    pub quantity: u64,
    pub source_label: String,
}

/// Field extractors for one family of supplier layouts.
pub trait SupplierFamily: Send + Sync {
    /// Family name used in logs.
    fn name(&self) -> &'static str;

    fn invoice_number(&self, text: &str) -> String;

    /// Issue date as ISO `YYYY-MM-DD`.
    fn issue_date(&self, text: &str) -> String;

    fn client_name(&self, text: &str) -> String {
        generic::client_name(text)
    }

    /// All distinct site codes in order of first occurrence.
    fn site_codes(&self, text: &str) -> Vec<String>;

    fn site_code(&self, text: &str) -> String {
        self.site_codes(text).into_iter().next().unwrap_or_default()
    }

    fn site_name(&self, text: &str) -> String;

    fn meter_point_code(&self, text: &str) -> String;

    fn address(&self, text: &str, scope: AddressScope) -> String;

    /// Single consumption figure with the label of the phrase it came from.
    fn consumption(&self, text: &str) -> Option<ExtractionMatch<u64>>;

    /// Metered sub-periods. Families without period tables return nothing.
    fn consumption_periods(&self, _text: &str) -> Vec<ConsumptionPeriod> {
        Vec::new()
    }

    /// Total payment, zero when not found.
    fn total_payment(&self, text: &str) -> Decimal;

    fn billing_period(&self, text: &str) -> DateRange;

    fn segmentation(&self) -> SegmentationProfile;
}

/// Select the extractor family for a classified supplier.
pub fn family_for(supplier: Supplier, config: &ExtractionConfig) -> Box<dyn SupplierFamily> {
    match supplier {
        Supplier::PpcEnergie => Box::new(PpcFamily::new(config.max_consumption_kwh)),
        _ => Box::new(ElectricaFamily::new(config.max_consumption_kwh)),
    }
}

/// Capture group 1 of every pattern, ordered by position and deduplicated.
pub(crate) fn collect_codes(text: &str, patterns: &[&Regex]) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = patterns
        .iter()
        .flat_map(|&pattern| {
            pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| (m.start(), m.as_str()))
        })
        .collect();
    found.sort_by_key(|(position, _)| *position);

    let mut codes: Vec<String> = Vec::new();
    for (_, code) in found {
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    codes
}

/// A consumption figure, rounded, if it is non-negative and below `max`.
pub(crate) fn plausible_kwh(raw: &str, max: u64) -> Option<u64> {
    let value = normalize_number(raw)?;
    if value < 0.0 || value >= max as f64 {
        return None;
    }
    Some(value.round() as u64)
}

/// A non-negative money amount.
pub(crate) fn plausible_amount(raw: &str) -> Option<Decimal> {
    normalize_amount(raw).filter(|amount| !amount.is_sign_negative())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazy_static::lazy_static;
    use pretty_assertions::assert_eq;

    lazy_static! {
        static ref LETTERS: Regex = Regex::new(r"L(\d+)").unwrap();
        static ref NUMBERS: Regex = Regex::new(r"N(\d+)").unwrap();
    }

    #[test]
    fn test_codes_follow_text_order_across_patterns() {
        let codes = collect_codes("N2 L1 N3 L2 N1", &[&*LETTERS, &*NUMBERS]);
        assert_eq!(codes, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_plausible_kwh() {
        assert_eq!(plausible_kwh("12.450", 10_000_000), Some(12450));
        assert_eq!(plausible_kwh("48,6", 10_000_000), Some(49));
        assert_eq!(plausible_kwh("-5", 10_000_000), None);
        assert_eq!(plausible_kwh("10.000.000", 10_000_000), None);
        assert_eq!(plausible_kwh("kWh", 10_000_000), None);
    }

    #[test]
    fn test_plausible_amount_rejects_negative() {
        assert_eq!(plausible_amount("-12,50"), None);
        assert_eq!(plausible_amount("12,50"), Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_family_selection() {
        let config = ExtractionConfig::default();
        assert_eq!(family_for(Supplier::PpcEnergie, &config).name(), "PPC");
        assert_eq!(family_for(Supplier::Unknown, &config).name(), "ELECTRICA");
        assert_eq!(family_for(Supplier::Eon, &config).name(), "ELECTRICA");
    }
}
