//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use enerx_core::{
    monthly_analysis, processing_summary, InvoiceParser, InvoiceRecord, PdfConfig, RecordStatus,
};

use super::load_config;
use crate::report::{self, OutputFormat};
use crate::source;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Number of documents processed concurrently (default from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Also write the records and monthly analysis report tables
    #[arg(long)]
    report: bool,

    /// Client name used in report file names (default from config)
    #[arg(long)]
    client: Option<String>,
}

/// Records extracted from one file.
struct FileResult {
    path: PathBuf,
    records: Vec<InvoiceRecord>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| source::is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(InvoiceParser::new().with_config(config.extraction.clone()));
    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    debug!("Processing {} files with {} jobs", files.len(), jobs);

    // Results keep input order regardless of completion order
    let results: Vec<FileResult> = stream::iter(files)
        .map(|path| process_file(path, Arc::clone(&parser), config.pdf.clone()))
        .buffered(jobs)
        .inspect(|_| pb.inc(1))
        .collect()
        .await;

    pb.finish_and_clear();

    if let Some(ref output_dir) = args.output_dir {
        for result in &results {
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");
            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));

            fs::write(&output_path, report::format_records(&result.records, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    let file_count = results.len();
    let records: Vec<InvoiceRecord> = results.into_iter().flat_map(|r| r.records).collect();
    let today = Local::now().date_naive();

    if args.report {
        let dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        let client = args.client.as_deref().unwrap_or(&config.export.client_name);
        let stem = report::report_stem(client, today);

        let analysis = monthly_analysis(&records);
        let (records_path, analysis_path) = report::write_report(&dir, &stem, &records, &analysis)?;
        println!(
            "{} Report written to {} and {}",
            style("✓").green(),
            records_path.display(),
            analysis_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        file_count,
        start.elapsed()
    );
    report::print_summary(&processing_summary(&records, today));

    let failed: Vec<&InvoiceRecord> = records
        .iter()
        .filter(|r| r.status == RecordStatus::Error)
        .collect();
    if !failed.is_empty() {
        println!();
        println!("{}", style("Records with errors:").red());
        for record in failed {
            println!("  - {}: {}", record.file_name, record.observations);
        }
    }

    Ok(())
}

/// Read and parse one file on the blocking pool.
///
/// A file whose text cannot be read yields a single ERROR record.
async fn process_file(path: PathBuf, parser: Arc<InvoiceParser>, pdf: PdfConfig) -> FileResult {
    let name = source::document_name(&path);
    let task_path = path.clone();
    let task_parser = Arc::clone(&parser);
    let task_name = name.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        match source::load_text(&task_path, &pdf) {
            Ok(text) => task_parser.parse(&text, &task_name),
            Err(e) => {
                warn!("Failed to read {}: {}", task_path.display(), e);
                vec![task_parser.failure_record(&task_name, &e.to_string())]
            }
        }
    })
    .await;

    let records = match outcome {
        Ok(records) => records,
        Err(e) => {
            warn!("Processing task for {} failed: {}", path.display(), e);
            vec![parser.failure_record(&name, &e.to_string())]
        }
    };

    FileResult { path, records }
}
