//! Invoice parser: document text to ordered invoice records.

use std::sync::Arc;
use std::time::Instant;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use super::assembler::{Assembler, RecordFields};
use super::classifier::classify;
use super::ids::{IdSource, UuidIds};
use super::segmenter::{pages, segment};
use super::suppliers::{family_for, AddressScope, SupplierFamily};
use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceRecord;

/// Rule-based parser for Romanian electricity invoices.
///
/// The parser holds no mutable state and can be shared between threads.
pub struct InvoiceParser {
    config: ExtractionConfig,
    ids: Arc<dyn IdSource>,
    /// Fixed processing date; today's local date when unset.
    processing_date: Option<NaiveDate>,
}

impl InvoiceParser {
    /// Create a parser with default settings and UUID record ids.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            ids: Arc::new(UuidIds),
            processing_date: None,
        }
    }

    /// Set extraction configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the record id source.
    pub fn with_id_source(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Stamp records with a fixed processing date.
    pub fn with_processing_date(mut self, date: NaiveDate) -> Self {
        self.processing_date = Some(date);
        self
    }

    fn assembler(&self) -> Assembler<'_> {
        let date = self
            .processing_date
            .unwrap_or_else(|| Local::now().date_naive());
        Assembler::new(self.ids.as_ref(), date)
    }

    /// Parse one document's text into records.
    ///
    /// Returns one record per site code and metered sub-period, in order of
    /// code discovery. Never fails: missing data lowers record status instead.
    pub fn parse(&self, text: &str, file_name: &str) -> Vec<InvoiceRecord> {
        let start = Instant::now();

        let supplier = classify(text);
        let family = family_for(supplier, &self.config);
        info!(file = file_name, supplier = %supplier, family = family.name(), "parsing invoice");

        let document = RecordFields {
            file_name: file_name.to_string(),
            supplier,
            invoice_number: family.invoice_number(text),
            issue_date: family.issue_date(text),
            client_name: family.client_name(text),
            period: family.billing_period(text),
            total_payment: family.total_payment(text),
            ..RecordFields::default()
        };
        debug!(
            invoice_number = %document.invoice_number,
            issue_date = %document.issue_date,
            client = %document.client_name,
            total = %document.total_payment,
            start = %document.period.start_date,
            end = %document.period.end_date,
            "document fields"
        );

        let (codes, skip_first_page) = self.site_codes(family.as_ref(), text);
        let assembler = self.assembler();

        let records = if codes.is_empty() {
            debug!("no site codes, building a single record");
            let fields = site_fields(family.as_ref(), text, &document, AddressScope::Document);
            vec![assembler.assemble(fields)]
        } else {
            debug!(codes = ?codes, skip_first_page, "site codes");
            let profile = family.segmentation();
            let mut records = Vec::new();

            for section in segment(text, &codes, skip_first_page, &profile) {
                let site = RecordFields {
                    site_code: section.code.clone(),
                    ..site_fields(family.as_ref(), section.text, &document, AddressScope::Site)
                };

                let periods = family.consumption_periods(section.text);
                if periods.is_empty() {
                    records.push(assembler.assemble(site));
                    continue;
                }

                for period in periods {
                    records.push(assembler.assemble(RecordFields {
                        period: period.period,
                        consumption_kwh: period.quantity,
                        source_line: period.source_label,
                        ..site.clone()
                    }));
                }
            }
            records
        };

        info!(
            file = file_name,
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "parsed invoice"
        );
        records
    }

    /// A single ERROR record for a document whose text could not be acquired.
    pub fn failure_record(&self, file_name: &str, reason: &str) -> InvoiceRecord {
        self.assembler().failure(file_name, reason)
    }

    /// Site codes of the document and whether the first page is a cover sheet.
    ///
    /// In a multi-page document with several sites the first page is a
    /// summary shared by all of them, so segmentation starts from the second
    /// page. A code found only on the cover still gets a header or window
    /// section.
    fn site_codes(&self, family: &dyn SupplierFamily, text: &str) -> (Vec<String>, bool) {
        let codes = family.site_codes(text);
        let skip_first_page = self.config.detect_cover_page
            && codes.len() > 1
            && pages(text).is_some_and(|pages| pages.len() > 1);

        if skip_first_page {
            debug!(codes = codes.len(), "first page is a cover sheet");
        }
        (codes, skip_first_page)
    }
}

impl Default for InvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Site-scoped fields of `text` on top of the document-level fields.
fn site_fields(
    family: &dyn SupplierFamily,
    text: &str,
    document: &RecordFields,
    scope: AddressScope,
) -> RecordFields {
    let (consumption_kwh, source_line) = match family.consumption(text) {
        Some(found) => {
            debug!(kwh = found.value, source = %found.source, at = ?found.position, "consumption");
            (found.value, found.source)
        }
        None => (0, String::new()),
    };

    RecordFields {
        site_name: family.site_name(text),
        site_code: family.site_code(text),
        meter_point_code: family.meter_point_code(text),
        address: family.address(text, scope),
        consumption_kwh,
        source_line,
        ..document.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::ids::SequentialIds;
    use crate::models::invoice::{RecordStatus, Supplier};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn parser() -> InvoiceParser {
        InvoiceParser::new()
            .with_id_source(Arc::new(SequentialIds::new()))
            .with_processing_date(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
    }

    const PREMIER_INVOICE: &str = "PREMIER ENERGY SRL
Factura nr. PE2024001234
Data emiterii: 05.02.2024
CLIENT SC EXEMPLU INDUSTRIES SRL
Adresa: Str. Fabricii nr. 12, Cluj-Napoca
Cod loc consum (NLC): 1234567890
Perioada de facturare: 01.01.2024-31.01.2024
Total loc de consum 12.450 kWh
Total de plata: 8.234,50 lei
";

    const ELECTRICA_INVOICE: &str = "ELECTRICA FURNIZARE SA
Serie/Nr: EFG-00012345
Data emiterii: 10.02.2024
CLIENT PRIMARIA COMUNEI EXEMPLU
Adresa de corespondenta: Str. Primariei nr. 1, Exemplu
Perioada de facturare: 01.01.2024-31.01.2024
Total de plata: 1.500,00 lei
--- PAGE BREAK ---
DETALII LOC DE CONSUM – SCOALA GIMNAZIALA – energie electrica
Cod loc consum (NLC): 1111111111
Adresa loc de consum: Str. Scolii nr. 2, Exemplu
Contract 1
Total loc de consum 350 kWh
--- PAGE BREAK ---
DETALII LOC DE CONSUM – CAMIN CULTURAL – energie electrica
Cod loc consum (NLC): 2222222222
Adresa loc de consum: Str. Caminului nr. 7, Exemplu
Contract 2
Total loc de consum 120 kWh
";

    const PPC_INVOICE: &str = "PPC Energie SA
Factura seria 25EI nr 06295537 din data de 24.02.2025
CLIENT COMUNA BANIA CUI 123456
Perioadă facturare: 17.10.2024-31.01.2025
Total de plată (6=4+5) 30.075,79 lei
--- PAGE BREAK ---
CAMIN-137689441/16.09.2014
Adresă loc consum: Strada BANIA, nr. 129, localitate BANIA, cod poștal 327015
Cod ELECTEL: 541393231, POD: RO005E541393231
Energie activă 17.10.24-16.01.25 kWh 1 26222/estimat convenie 26222/cit 0 0 0
Energie activă 17.01.25-31.01.25 kWh 1 26222/cit 26270/cit 48 0 48
--- PAGE BREAK ---
SCOALA-137689442/16.09.2014
Adresă loc consum: Strada SCOLII, nr. 5, localitate BANIA
Cod ELECTEL: 541393232, POD: RO005E541393232
Consum energie activă 310 kWh
";

    #[test]
    fn test_single_site_invoice_is_ok() {
        let records = parser().parse(PREMIER_INVOICE, "premier.pdf");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.supplier, Supplier::PremierEnergy);
        assert_eq!(record.status, RecordStatus::Ok);
        assert_eq!(record.invoice_number, "PE2024001234");
        assert_eq!(record.issue_date, "2024-02-05");
        assert_eq!(record.client_name, "SC EXEMPLU INDUSTRIES SRL");
        assert_eq!(record.site_code, "1234567890");
        assert_eq!(record.address, "Str. Fabricii nr. 12, Cluj-Napoca");
        assert_eq!(record.start_date, "2024-01-01");
        assert_eq!(record.end_date, "2024-01-31");
        assert_eq!(record.consumption_kwh, 12450);
        assert_eq!(record.source_line, "Total loc de consum");
        assert_eq!(record.total_payment, Decimal::new(823450, 2));
        assert_eq!(record.processing_date, "2025-03-01");
        assert_eq!(record.observations, "");
    }

    #[test]
    fn test_unrecognised_text_is_error() {
        let records = parser().parse("Lorem ipsum factura fiscala\nTotal 100", "noise.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].supplier, Supplier::Unknown);
        assert_eq!(records[0].status, RecordStatus::Error);
        assert!(records[0].observations.starts_with("incomplete data: unknown supplier"));
    }

    #[test]
    fn test_multi_site_electrica_splits_by_page() {
        let records = parser().parse(ELECTRICA_INVOICE, "electrica.pdf");
        assert_eq!(records.len(), 2);

        let summary: Vec<(&str, &str, &str, u64)> = records
            .iter()
            .map(|r| {
                (
                    r.site_code.as_str(),
                    r.site_name.as_str(),
                    r.address.as_str(),
                    r.consumption_kwh,
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1111111111", "SCOALA GIMNAZIALA", "Str. Scolii nr. 2, Exemplu", 350),
                ("2222222222", "CAMIN CULTURAL", "Str. Caminului nr. 7, Exemplu", 120),
            ]
        );
        for record in &records {
            assert_eq!(record.status, RecordStatus::Ok);
            assert_eq!(record.invoice_number, "EFG-00012345");
            assert_eq!(record.client_name, "PRIMARIA COMUNEI EXEMPLU");
            assert_eq!(record.total_payment, Decimal::new(150000, 2));
        }
    }

    #[test]
    fn test_cover_page_is_skipped() {
        let text = ELECTRICA_INVOICE.replacen(
            "--- PAGE BREAK ---",
            "Sumar: NLC 1111111111 si NLC 2222222222\n--- PAGE BREAK ---",
            1,
        );
        let records = parser().parse(&text, "cover.pdf");
        let consumption: Vec<u64> = records.iter().map(|r| r.consumption_kwh).collect();
        assert_eq!(consumption, vec![350, 120]);

        let without_detection = parser().with_config(ExtractionConfig {
            detect_cover_page: false,
            ..ExtractionConfig::default()
        });
        let records = without_detection.parse(&text, "cover.pdf");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].consumption_kwh, records[1].consumption_kwh);
    }

    #[test]
    fn test_cover_page_with_one_code_is_skipped() {
        let text = ELECTRICA_INVOICE.replacen(
            "--- PAGE BREAK ---",
            "Cod loc consum (NLC): 1111111111\nTotal loc de consum 470 kWh\n--- PAGE BREAK ---",
            1,
        );
        let records = parser().parse(&text, "cover.pdf");
        let summary: Vec<(&str, u64)> = records
            .iter()
            .map(|r| (r.site_code.as_str(), r.consumption_kwh))
            .collect();
        assert_eq!(summary, vec![("1111111111", 350), ("2222222222", 120)]);
        assert_eq!(records[0].address, "Str. Scolii nr. 2, Exemplu");
    }

    #[test]
    fn test_code_only_on_cover_page_still_gets_a_record() {
        let text = ELECTRICA_INVOICE.replacen(
            "--- PAGE BREAK ---",
            "Cod loc consum (NLC): 3333333333\n--- PAGE BREAK ---",
            1,
        );
        let records = parser().parse(&text, "cover.pdf");
        let codes: Vec<&str> = records.iter().map(|r| r.site_code.as_str()).collect();
        assert_eq!(codes, vec!["3333333333", "1111111111", "2222222222"]);
        assert_eq!(records[1].consumption_kwh, 350);
        assert_eq!(records[2].consumption_kwh, 120);
    }

    #[test]
    fn test_electrica_without_page_markers_splits_by_header() {
        let text = ELECTRICA_INVOICE.replace("--- PAGE BREAK ---\n", "");
        let records = parser().parse(&text, "electrica.pdf");

        let summary: Vec<(&str, &str, &str, u64)> = records
            .iter()
            .map(|r| {
                (
                    r.site_code.as_str(),
                    r.site_name.as_str(),
                    r.address.as_str(),
                    r.consumption_kwh,
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("1111111111", "SCOALA GIMNAZIALA", "Str. Scolii nr. 2, Exemplu", 350),
                ("2222222222", "CAMIN CULTURAL", "Str. Caminului nr. 7, Exemplu", 120),
            ]
        );
    }

    #[test]
    fn test_ppc_without_page_markers_splits_by_location() {
        let text = "PPC Energie SA
Factura seria 25EI nr 06295537 din data de 24.02.2025
CLIENT COMUNA BANIA CUI 123456
Perioadă facturare: 17.10.2024-31.01.2025
Total de plată (6=4+5) 30.075,79 lei
CAMIN CULTURAL
Adresă loc consum: Strada BANIA, nr. 129, localitate BANIA
Cod ELECTEL: 541393231, POD: RO005E541393231
Energie activă 17.10.24-16.01.25 kWh 1 26222/estimat convenie 26222/cit 0 0 0
Energie activă 17.01.25-31.01.25 kWh 1 26222/cit 26270/cit 48 0 48
SCOALA GIMNAZIALA
Adresă loc consum: Strada SCOLII, nr. 5, localitate BANIA
Cod ELECTEL: 541393232, POD: RO005E541393232
Consum energie activă 310 kWh
";
        let records = parser().parse(text, "ppc.pdf");
        let summary: Vec<(&str, &str, &str, u64)> = records
            .iter()
            .map(|r| {
                (
                    r.site_code.as_str(),
                    r.start_date.as_str(),
                    r.end_date.as_str(),
                    r.consumption_kwh,
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("541393231", "2024-10-17", "2025-01-16", 0),
                ("541393231", "2025-01-17", "2025-01-31", 48),
                ("541393232", "2024-10-17", "2025-01-31", 310),
            ]
        );
    }

    #[test]
    fn test_ppc_periods_become_records() {
        let records = parser().parse(PPC_INVOICE, "ppc.pdf");
        let summary: Vec<(&str, &str, &str, u64)> = records
            .iter()
            .map(|r| {
                (
                    r.site_code.as_str(),
                    r.start_date.as_str(),
                    r.end_date.as_str(),
                    r.consumption_kwh,
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                ("541393231", "2024-10-17", "2025-01-16", 0),
                ("541393231", "2025-01-17", "2025-01-31", 48),
                ("541393232", "2024-10-17", "2025-01-31", 310),
            ]
        );
        assert_eq!(records[0].site_name, "CAMIN");
        assert_eq!(records[2].site_name, "SCOALA");
        assert_eq!(records[2].source_line, "Consum energie activă");
        for record in &records {
            assert_eq!(record.supplier, Supplier::PpcEnergie);
            assert_eq!(record.status, RecordStatus::Ok);
            assert_eq!(record.invoice_number, "25EI 06295537");
            assert_eq!(record.issue_date, "2025-02-24");
            assert_eq!(record.client_name, "COMUNA BANIA");
            assert_eq!(record.total_payment, Decimal::new(3007579, 2));
        }
    }

    #[test]
    fn test_document_without_codes_is_incomplete() {
        let text = "ELECTRICA\nFactura nr. EFG99999\nData emiterii: 01.02.2024\nTotal de plata: 10,00 lei";
        let records = parser().parse(text, "single.pdf");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, RecordStatus::Incomplete);
        assert_eq!(records[0].observations, "incomplete data: site code, billing period");
        assert_eq!(records[0].source_line, "N/A");
    }

    #[test]
    fn test_parsing_is_idempotent() {
        let parser = parser();
        let strip_id = |mut records: Vec<InvoiceRecord>| {
            records.iter_mut().for_each(|r| r.id.clear());
            records
        };

        let first = strip_id(parser.parse(PPC_INVOICE, "ppc.pdf"));
        let second = strip_id(parser.parse(PPC_INVOICE, "ppc.pdf"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_failure_record() {
        let record = parser().failure_record("scan.pdf", "PDF has no pages");
        assert_eq!(record.status, RecordStatus::Error);
        assert_eq!(record.observations, "PDF has no pages");
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InvoiceParser>();
    }
}
