//! Process command - extract records from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use enerx_core::InvoiceParser;

use super::load_config;
use crate::report::{format_records, OutputFormat};
use crate::source;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !source::is_supported(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading document...");

    let name = source::document_name(&args.input);
    let parser = InvoiceParser::new().with_config(config.extraction.clone());

    let input = args.input.clone();
    let pdf = config.pdf.clone();
    let records = match tokio::task::spawn_blocking(move || source::load_text(&input, &pdf)).await? {
        Ok(text) => {
            pb.set_message("Extracting records...");
            parser.parse(&text, &name)
        }
        Err(e) => {
            warn!("Could not read {}: {}", args.input.display(), e);
            vec![parser.failure_record(&name, &e.to_string())]
        }
    };

    pb.finish_and_clear();

    let output = format_records(&records, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} records written to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
