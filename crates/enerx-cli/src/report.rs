//! Record output formats and the two-table batch report.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use console::style;

use enerx_core::{InvoiceRecord, MonthlyAnalysis, ProcessingSummary};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Columns of the "Date Facturi" table.
const RECORD_COLUMNS: [&str; 18] = [
    "Nume Fișier",
    "Furnizor",
    "Nr Factură",
    "Data Emiterii",
    "Nume Client",
    "Nume Locație",
    "Cod NLC",
    "Cod POD",
    "Adresă",
    "Data Start",
    "Data End",
    "Consum (kWh)",
    "Sursa Linie",
    "Total Plată (RON)",
    "Data Procesării",
    "Link Document",
    "Status",
    "Observații",
];

pub fn format_records(records: &[InvoiceRecord], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => {
            let mut data = Vec::new();
            write_records_csv(&mut data, records)?;
            Ok(String::from_utf8(data)?)
        }
        OutputFormat::Text => Ok(format_text(records)),
    }
}

pub fn write_records_csv<W: Write>(writer: W, records: &[InvoiceRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(RECORD_COLUMNS)?;

    for r in records {
        let consumption = r.consumption_kwh.to_string();
        let total = r.total_payment.to_string();
        let row: [&str; 18] = [
            &r.file_name,
            r.supplier.tag(),
            &r.invoice_number,
            &r.issue_date,
            &r.client_name,
            &r.site_name,
            &r.site_code,
            &r.meter_point_code,
            &r.address,
            &r.start_date,
            &r.end_date,
            &consumption,
            &r.source_line,
            &total,
            &r.processing_date,
            &r.document_link,
            r.status.as_str(),
            &r.observations,
        ];
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Site-by-month table with one column per month present in any site.
pub fn write_analysis_csv<W: Write>(writer: W, analysis: &[MonthlyAnalysis]) -> anyhow::Result<()> {
    let months: BTreeSet<&str> = analysis
        .iter()
        .flat_map(|site| site.monthly_data.keys().map(String::as_str))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["Cod NLC", "Denumire Locație"];
    header.extend(months.iter().copied());
    header.extend(["TOTAL AN", "Medie Lunară"]);
    wtr.write_record(&header)?;

    for site in analysis {
        let mut row = vec![site.site_code.clone(), site.site_name.clone()];
        row.extend(
            months
                .iter()
                .map(|m| site.monthly_data.get(*m).copied().unwrap_or(0).to_string()),
        );
        row.push(site.total_year.to_string());
        row.push(site.monthly_average.to_string());
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// `Raport_Facturi_<client>_<date>` with whitespace in the client name replaced.
pub fn report_stem(client: &str, date: NaiveDate) -> String {
    let client = client.split_whitespace().collect::<Vec<_>>().join("_");
    format!("Raport_Facturi_{}_{}", client, date.format("%Y-%m-%d"))
}

/// Write the records and analysis tables into `dir`, returning their paths.
pub fn write_report(
    dir: &Path,
    stem: &str,
    records: &[InvoiceRecord],
    analysis: &[MonthlyAnalysis],
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let records_path = dir.join(format!("{}_records.csv", stem));
    let analysis_path = dir.join(format!("{}_analysis.csv", stem));

    write_records_csv(std::fs::File::create(&records_path)?, records)?;
    write_analysis_csv(std::fs::File::create(&analysis_path)?, analysis)?;

    Ok((records_path, analysis_path))
}

pub fn print_summary(summary: &ProcessingSummary) {
    println!(
        "   {} records: {} OK, {} incomplete, {} errors ({})",
        summary.total_records,
        style(summary.successful_records).green(),
        style(summary.incomplete_records).yellow(),
        style(summary.error_records).red(),
        summary.processing_date
    );
}

fn format_text(records: &[InvoiceRecord]) -> String {
    let mut output = String::new();

    for r in records {
        output.push_str(&format!("{} | {} | {}\n", r.file_name, r.supplier, r.status));
        output.push_str(&format!("  Invoice: {}  Date: {}\n", r.invoice_number, r.issue_date));
        output.push_str(&format!("  Client:  {}\n", r.client_name));
        output.push_str(&format!("  Site:    {} ({})\n", r.site_name, r.site_code));
        if !r.meter_point_code.is_empty() {
            output.push_str(&format!("  POD:     {}\n", r.meter_point_code));
        }
        output.push_str(&format!("  Address: {}\n", r.address));
        output.push_str(&format!("  Period:  {} - {}\n", r.start_date, r.end_date));
        output.push_str(&format!(
            "  Consumption: {} kWh ({})\n",
            r.consumption_kwh, r.source_line
        ));
        output.push_str(&format!("  Total:   {} RON\n", r.total_payment));
        if !r.observations.is_empty() {
            output.push_str(&format!("  Observations: {}\n", r.observations));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use enerx_core::{RecordStatus, Supplier};

    fn record(code: &str, end: &str, kwh: u64) -> InvoiceRecord {
        InvoiceRecord {
            id: "rec-1".to_string(),
            file_name: "factura.pdf".to_string(),
            supplier: Supplier::CezVanzare,
            invoice_number: "CEZ123456".to_string(),
            issue_date: "2024-02-05".to_string(),
            client_name: "PRIMARIA EXEMPLU".to_string(),
            site_name: "SCOALA, NR 1".to_string(),
            site_code: code.to_string(),
            meter_point_code: String::new(),
            address: "Str. Scolii nr. 2".to_string(),
            start_date: "2024-01-01".to_string(),
            end_date: end.to_string(),
            consumption_kwh: kwh,
            source_line: "Consum".to_string(),
            total_payment: Default::default(),
            processing_date: "2024-03-01".to_string(),
            document_link: String::new(),
            status: RecordStatus::Ok,
            observations: String::new(),
        }
    }

    #[test]
    fn test_report_stem() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            report_stem("Primaria  Comunei Bania", date),
            "Raport_Facturi_Primaria_Comunei_Bania_2025-03-01"
        );
    }

    #[test]
    fn test_records_csv() {
        let mut data = Vec::new();
        write_records_csv(&mut data, &[record("1234567890", "2024-01-31", 350)]).unwrap();
        let csv = String::from_utf8(data).unwrap();
        let mut lines = csv.lines();

        assert!(lines.next().unwrap().starts_with("Nume Fișier,Furnizor,Nr Factură"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("factura.pdf,CEZ VÂNZARE,CEZ123456,2024-02-05"));
        assert!(row.contains("\"SCOALA, NR 1\""));
        assert!(row.contains(",350,Consum,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_analysis_csv_has_a_column_per_month() {
        let records = vec![
            record("111", "2024-01-31", 10),
            record("222", "2024-02-29", 20),
        ];
        let analysis = enerx_core::monthly_analysis(&records);

        let mut data = Vec::new();
        write_analysis_csv(&mut data, &analysis).unwrap();
        let csv = String::from_utf8(data).unwrap();

        assert_eq!(
            csv.lines().collect::<Vec<_>>(),
            vec![
                "Cod NLC,Denumire Locație,2024-01,2024-02,TOTAL AN,Medie Lunară",
                "111,\"SCOALA, NR 1\",10,0,10,10",
                "222,\"SCOALA, NR 1\",0,20,20,20",
            ]
        );
    }

    #[test]
    fn test_text_format_mentions_status() {
        let text = format_records(&[record("111", "2024-01-31", 10)], OutputFormat::Text).unwrap();
        assert!(text.starts_with("factura.pdf | CEZ VÂNZARE | OK"));
        assert!(text.contains("Consumption: 10 kWh (Consum)"));
    }
}
