//! PPC ENERGIE layout family.
//!
//! Sites are identified by 9-digit ELECTEL codes, each on its own page under
//! an upper-case location header. A site's consumption table may list several
//! metered sub-periods.

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use tracing::trace;

use super::generic::{self, accept_client_name, is_label_word};
use super::{
    collect_codes, plausible_amount, plausible_kwh, AddressScope, ConsumptionPeriod,
    SupplierFamily,
};
use crate::invoice::rules::patterns::*;
use crate::invoice::rules::text::{collapse_whitespace, preceding};
use crate::invoice::rules::{first_match, group, normalize_date, DateRange, ExtractionMatch, Rule};
use crate::invoice::segmenter::{HeaderRule, SegmentationProfile};

const ACTIVE_ENERGY: &str = "Energie activă";
const ACTIVE_ENERGY_CONSUMPTION: &str = "Consum energie activă";

/// Characters before a table row inspected for regulatory breakdown markers.
const ROW_CONTEXT_CHARS: usize = 80;

/// Extractors for PPC ENERGIE invoices.
#[derive(Debug, Clone)]
pub struct PpcFamily {
    max_consumption_kwh: u64,
}

impl PpcFamily {
    pub fn new(max_consumption_kwh: u64) -> Self {
        Self { max_consumption_kwh }
    }

    fn kwh_rule(&self, name: &'static str, pattern: &'static Regex) -> Rule<'static, ExtractionMatch<u64>> {
        let max = self.max_consumption_kwh;
        Rule::new(name, pattern, move |caps| {
            let raw = caps.get(1)?;
            let kwh = plausible_kwh(raw.as_str(), max)?;
            Some(
                ExtractionMatch::new(kwh, ACTIVE_ENERGY_CONSUMPTION)
                    .with_position(raw.start(), raw.end()),
            )
        })
    }

    /// Quantity column of a table row: the number after the last meter
    /// index token (`26270/cit 48`), else the first number of the row.
    fn metered_quantity(&self, rest: &str) -> u64 {
        let first_number = |s: &str| DIGITS.find(s).and_then(|m| m.as_str().parse::<u64>().ok());

        let quantity = match rest.rsplit_once('/') {
            Some((_, last)) => METER_READING_TYPE
                .captures(last)
                .and_then(|caps| caps[1].parse::<u64>().ok())
                .or_else(|| first_number(last)),
            None => first_number(rest),
        };

        quantity
            .filter(|q| *q < self.max_consumption_kwh)
            .unwrap_or(0)
    }
}

impl Default for PpcFamily {
    fn default() -> Self {
        Self::new(10_000_000)
    }
}

impl SupplierFamily for PpcFamily {
    fn name(&self) -> &'static str {
        "PPC"
    }

    fn invoice_number(&self, text: &str) -> String {
        let rules = [Rule::new("seria nr", &*PPC_SERIA_NR, |caps| {
            Some(format!("{} {}", group(caps, 1)?, group(caps, 2)?))
        })];
        first_match(text, &rules).unwrap_or_default()
    }

    fn issue_date(&self, text: &str) -> String {
        let rules = [
            Rule::new("din data de", &*PPC_ISSUED_ON, date_parts),
            Rule::new("data facturii", &*PPC_INVOICE_DATE, date_parts),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn client_name(&self, text: &str) -> String {
        let rules = [
            Rule::new("client before label", &*PPC_CLIENT_BEFORE_LABEL, accept_client_name).scanning(),
            Rule::new("client", &*CLIENT_UPPERCASE, accept_client_name).scanning(),
            Rule::new("commune", &*PPC_COMMUNE, accept_client_name).scanning(),
            Rule::new("town hall", &*PPC_TOWN_HALL, accept_client_name).scanning(),
            Rule::new("after correspondence", &*PPC_NAME_AFTER_CORRESPONDENCE, accept_client_name)
                .scanning(),
            Rule::new("before correspondence", &*PPC_NAME_BEFORE_CORRESPONDENCE, |caps| {
                group(caps, 1)
                    .filter(|name| !is_label_word(name))
                    .map(str::to_string)
            }),
        ];
        first_match(text, &rules).unwrap_or_else(|| generic::client_name(text))
    }

    fn site_codes(&self, text: &str) -> Vec<String> {
        collect_codes(text, &[&*ELECTEL_LABELED, &*ELECTEL_FROM_POD])
    }

    fn site_name(&self, text: &str) -> String {
        let rules = [
            Rule::new("before site address", &*PPC_SITE_BEFORE_ADDRESS, |caps| {
                let name = strip_reference(group(caps, 1)?);
                (name.chars().count() >= 3 && !mentions_code(&name) && !name_starts_with_code(&name))
                    .then_some(name)
            }),
            Rule::new("first line", &*PPC_SITE_FIRST_LINE, |caps| {
                let name = strip_reference(group(caps, 1)?);
                (name.chars().count() >= 3
                    && !mentions_code(&name)
                    && !PPC_SITE_NOT_A_NAME.is_match(&name))
                .then_some(name)
            }),
            Rule::new("with reference", &*PPC_SITE_WITH_REFERENCE, |caps| {
                let name = group(caps, 1)?.to_string();
                (name.chars().count() >= 3 && !mentions_code(&name) && !name.to_lowercase().starts_with("adres"))
                    .then_some(name)
            }),
            Rule::new("before code", &*PPC_SITE_BEFORE_CODE, |caps| {
                let name = strip_reference(group(caps, 1)?);
                (name.chars().count() >= 3 && !mentions_code(&name)).then_some(name)
            }),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn meter_point_code(&self, text: &str) -> String {
        let pod = |caps: &Captures<'_>| group(caps, 1).map(str::to_string);
        let rules = [
            Rule::new("pod", &*PPC_POD, pod),
            Rule::new("national pod", &*PPC_POD_NATIONAL, pod),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    /// PPC sections always carry their own address, so the scope is ignored.
    fn address(&self, text: &str, _scope: AddressScope) -> String {
        let rules = [
            Rule::new("site address", &*PPC_SITE_ADDRESS_COLON, cleaned_address),
            Rule::new("site street", &*PPC_SITE_ADDRESS_STREET, cleaned_address),
            Rule::new("site text", &*PPC_SITE_ADDRESS_TEXT, cleaned_address),
            Rule::new("site line", &*PPC_SITE_ADDRESS_LINE, cleaned_address),
            Rule::new("headquarters", &*PPC_HEADQUARTERS_ADDRESS, cleaned_address),
            Rule::new("correspondence", &*PPC_CORRESPONDENCE_ADDRESS, cleaned_address),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn consumption(&self, text: &str) -> Option<ExtractionMatch<u64>> {
        let rules = [
            self.kwh_rule("active consumption", &*PPC_ACTIVE_CONSUMPTION),
            self.kwh_rule("total energy", &*PPC_TOTAL_ENERGY),
        ];
        first_match(text, &rules)
    }

    fn consumption_periods(&self, text: &str) -> Vec<ConsumptionPeriod> {
        let mut periods: Vec<ConsumptionPeriod> = Vec::new();

        for caps in PPC_CONSUMPTION_ROW.captures_iter(text) {
            let Some(row) = caps.get(0) else { continue };

            let context = preceding(text, row.start(), ROW_CONTEXT_CHARS);
            if REGULATORY_CONTEXT.is_match(context) || ROW_ORDINAL.is_match(context) {
                trace!(row = row.as_str(), "skipping breakdown row");
                continue;
            }

            let Some(period) = DateRange::from_captures(&caps) else {
                continue;
            };
            if periods.iter().any(|p| p.period == period) {
                continue;
            }

            let rest = caps.get(8).map_or("", |m| m.as_str());
            let quantity = self.metered_quantity(rest);
            trace!(start = %period.start_date, end = %period.end_date, quantity, "consumption row");

            periods.push(ConsumptionPeriod {
                period,
                quantity,
                source_label: ACTIVE_ENERGY.to_string(),
            });
        }

        periods
    }

    fn total_payment(&self, text: &str) -> Decimal {
        let rules = [
            Rule::new("total after formula", &*PPC_TOTAL_AFTER_FORMULA, amount),
            Rule::new("numbered total", &*PPC_TOTAL_NUMBERED, amount),
            Rule::new("total lei", &*PPC_TOTAL_LEI, amount),
            Rule::new("total", &*PPC_TOTAL, amount),
        ];
        first_match(text, &rules).unwrap_or(Decimal::ZERO)
    }

    fn billing_period(&self, text: &str) -> DateRange {
        let rules = [
            Rule::new("perioada facturare", &*PPC_PERIOD, DateRange::from_captures),
            Rule::new("perioada de facturare", &*PPC_PERIOD_DE, DateRange::from_captures),
        ];
        first_match(text, &rules).unwrap_or_default()
    }

    fn segmentation(&self) -> SegmentationProfile {
        SegmentationProfile {
            headers: vec![
                HeaderRule {
                    pattern: &*PPC_LOCATION_HEADER,
                    lookbehind: 0,
                },
                HeaderRule {
                    pattern: &*PPC_ELECTEL_HEADER,
                    lookbehind: 500,
                },
            ],
            window_before: 800,
            window_after: 3000,
        }
    }
}

fn date_parts(caps: &Captures<'_>) -> Option<String> {
    let date = normalize_date(group(caps, 1)?, group(caps, 2)?, group(caps, 3)?);
    (!date.is_empty()).then_some(date)
}

fn amount(caps: &Captures<'_>) -> Option<Decimal> {
    plausible_amount(group(caps, 1)?)
}

/// Drop a trailing contract reference (`CAMIN-137689441/16.09.2014`).
fn strip_reference(name: &str) -> String {
    SITE_REFERENCE_SUFFIX.replace(name, "").trim().to_string()
}

fn mentions_code(name: &str) -> bool {
    name.contains("ELECTEL") || name.contains("POD")
}

fn name_starts_with_code(name: &str) -> bool {
    name.get(..3).is_some_and(|head| head.eq_ignore_ascii_case("cod"))
        && name[3..].starts_with(char::is_whitespace)
}

fn cleaned_address(caps: &Captures<'_>) -> Option<String> {
    let raw = group(caps, 1)?;
    let address = POSTAL_CODE_SUFFIX.replace(raw, "");
    let address = TRAILING_COMMA.replace(address.trim(), "");
    let address = TRAILING_SIX_DIGITS.replace(address.trim(), "");
    let address = collapse_whitespace(&address);

    let plausible = address.chars().count() > 10
        && !ONLY_DIGITS.is_match(&address)
        && !CODE_LIKE.is_match(&address);
    plausible.then_some(address)
}
