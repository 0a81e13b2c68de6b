//! ELECTRICA layout family.
//!
//! Used for ELECTRICA and every supplier without a dedicated family. Sites
//! are identified by 10-12 digit NLC codes and described in
//! `DETALII LOC DE CONSUM` sections.

use regex::{Captures, Regex};
use rust_decimal::Decimal;

use super::{collect_codes, plausible_amount, plausible_kwh, AddressScope, SupplierFamily};
use crate::invoice::rules::patterns::*;
use crate::invoice::rules::text::collapse_whitespace;
use crate::invoice::rules::{first_match, group, normalize_date, DateRange, ExtractionMatch, Rule};
use crate::invoice::segmenter::{HeaderRule, SegmentationProfile};

/// Extractors for ELECTRICA-style invoices.
#[derive(Debug, Clone)]
pub struct ElectricaFamily {
    max_consumption_kwh: u64,
}

impl ElectricaFamily {
    pub fn new(max_consumption_kwh: u64) -> Self {
        Self { max_consumption_kwh }
    }

    fn kwh_rule(
        &self,
        name: &'static str,
        pattern: &'static Regex,
        label: &'static str,
    ) -> Rule<'static, ExtractionMatch<u64>> {
        let max = self.max_consumption_kwh;
        Rule::new(name, pattern, move |caps| {
            let raw = caps.get(1)?;
            let kwh = plausible_kwh(raw.as_str(), max)?;
            Some(ExtractionMatch::new(kwh, label).with_position(raw.start(), raw.end()))
        })
    }
}

impl Default for ElectricaFamily {
    fn default() -> Self {
        Self::new(10_000_000)
    }
}

impl SupplierFamily for ElectricaFamily {
    fn name(&self) -> &'static str {
        "ELECTRICA"
    }

    fn invoice_number(&self, text: &str) -> String {
        let rules = [
            Rule::new("serie/nr", &*ELECTRICA_SERIE_NR, invoice_id),
            Rule::new("id factura", &*ELECTRICA_INVOICE_ID, invoice_id),
            Rule::new("nr factura", &*ELECTRICA_NR_FACTURA, invoice_id),
            Rule::new("factura nr", &*ELECTRICA_FACTURA_NR, invoice_id),
            Rule::new("seria nr", &*ELECTRICA_SERIA_NR, |caps| {
                Some(format!("{}-{}", group(caps, 1)?, group(caps, 2)?))
            }),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn issue_date(&self, text: &str) -> String {
        let rules = [
            Rule::new("labeled dotted date", &*ELECTRICA_ISSUE_DATE_DOT, date_parts),
            Rule::new("labeled dashed date", &*ELECTRICA_ISSUE_DATE_DASH, date_parts),
            Rule::new("labeled iso date", &*ELECTRICA_ISSUE_DATE_ISO, date_parts),
            Rule::new("date after serie/nr", &*ELECTRICA_DATE_AFTER_SERIE, date_parts),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn site_codes(&self, text: &str) -> Vec<String> {
        collect_codes(
            text,
            &[
                &*NLC_LABELED,
                &*NLC_PARENTHESIZED,
                &*NLC_COD_LOC_CONSUM,
                &*NLC_LOC_DE_CONSUM,
            ],
        )
    }

    fn site_name(&self, text: &str) -> String {
        let rules = [
            Rule::new("site details header", &*ELECTRICA_SITE_DETAILS, first_group),
            Rule::new("locality and commune", &*ELECTRICA_SITE_LOCALITY, |caps| {
                Some(format!("{}, Comuna {}", group(caps, 1)?, group(caps, 2)?))
            }),
            Rule::new("location label", &*ELECTRICA_SITE_LOCATION, first_group),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn meter_point_code(&self, text: &str) -> String {
        let pod = |caps: &Captures<'_>| {
            group(caps, 1)
                .filter(|code| code.len() >= 10)
                .map(str::to_string)
        };
        let rules = [
            Rule::new("pod", &*ELECTRICA_POD, pod),
            Rule::new("measurement point", &*ELECTRICA_POD_MEASUREMENT, pod),
            Rule::new("national pod", &*ELECTRICA_POD_NATIONAL, pod),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn address(&self, text: &str, scope: AddressScope) -> String {
        let mut rules = Vec::with_capacity(6);
        if scope == AddressScope::Site {
            rules.push(Rule::new("site address", &*ELECTRICA_SITE_ADDRESS, cleaned_address));
        }
        rules.extend([
            Rule::new("correspondence address", &*CORRESPONDENCE_ADDRESS, cleaned_address),
            Rule::new("headquarters address", &*HEADQUARTERS_ADDRESS, cleaned_address),
            Rule::new("client block address", &*CLIENT_BLOCK_ADDRESS, cleaned_address),
            Rule::new("locality", &*LOCALITY_ADDRESS, first_group),
            Rule::new("street", &*STREET_ADDRESS, first_group),
        ]);
        first_match(text, &rules).unwrap_or_default()
    }

    fn consumption(&self, text: &str) -> Option<ExtractionMatch<u64>> {
        let rules = [
            self.kwh_rule("site total", &*ELECTRICA_TOTAL_SITE_KWH, "Total loc de consum"),
            self.kwh_rule("active total", &*ELECTRICA_TOTAL_ACTIVE_KWH, "Total energie activă"),
            self.kwh_rule("active energy", &*ELECTRICA_ACTIVE_KWH, "Energie activă"),
            self.kwh_rule("billed quantity", &*ELECTRICA_BILLED_KWH, "Cantitate facturată"),
            self.kwh_rule("consumption", &*ELECTRICA_CONSUMPTION_KWH, "Consum"),
        ];
        first_match(text, &rules)
    }

    fn total_payment(&self, text: &str) -> Decimal {
        let rules = [
            Rule::new("total lei", &*ELECTRICA_TOTAL_LEI, amount),
            Rule::new("total after balance", &*ELECTRICA_TOTAL_AFTER_BALANCE, amount),
            Rule::new("total (lei)", &*ELECTRICA_TOTAL_LEI_HEADER, amount),
            Rule::new("total", &*ELECTRICA_TOTAL, amount),
        ];
        first_match(text, &rules).unwrap_or(Decimal::ZERO)
    }

    fn billing_period(&self, text: &str) -> DateRange {
        let rules = [
            Rule::new("billing period", &*ELECTRICA_PERIOD_LABELED, DateRange::from_captures),
            Rule::new("billing period short", &*ELECTRICA_PERIOD_SHORT_LABEL, DateRange::from_captures),
            Rule::new("billing", &*ELECTRICA_PERIOD_BILLING, DateRange::from_captures),
            Rule::new("bare range", &*DATE_RANGE, DateRange::from_captures),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn segmentation(&self) -> SegmentationProfile {
        SegmentationProfile {
            headers: vec![HeaderRule {
                pattern: &*ELECTRICA_SECTION_HEADER,
                lookbehind: 0,
            }],
            window_before: 500,
            window_after: 2500,
        }
    }
}

fn first_group(caps: &Captures<'_>) -> Option<String> {
    group(caps, 1).filter(|s| !s.is_empty()).map(str::to_string)
}

fn invoice_id(caps: &Captures<'_>) -> Option<String> {
    group(caps, 1)
        .filter(|id| id.chars().count() >= 5)
        .map(str::to_string)
}

fn date_parts(caps: &Captures<'_>) -> Option<String> {
    let date = normalize_date(group(caps, 1)?, group(caps, 2)?, group(caps, 3)?);
    (!date.is_empty()).then_some(date)
}

fn amount(caps: &Captures<'_>) -> Option<Decimal> {
    plausible_amount(group(caps, 1)?)
}

fn cleaned_address(caps: &Captures<'_>) -> Option<String> {
    let raw = group(caps, 1)?;
    let without_postal = POSTAL_CODE_SUFFIX.replace(raw, "");
    let trimmed = TRAILING_COMMA.replace(without_postal.trim(), "");
    let address = collapse_whitespace(&trimmed);
    (address.chars().count() > 10).then_some(address)
}
