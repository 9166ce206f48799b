//! Batch command - extract fields from multiple invoice PDFs.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use factura_core::models::config::ImportConfig;
use factura_core::models::parsed::ParsedInvoice;
use factura_core::models::partner::PartnerRegistry;
use factura_core::SimplePdfParser;

use super::process::{format_parsed, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Partner registry file
    #[arg(short, long)]
    registry: PathBuf,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    fail_fast: bool,
}

/// Outcome of processing a single file.
struct BatchResult {
    path: PathBuf,
    parsed: Option<ParsedInvoice>,
    error: Option<String>,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        ImportConfig::from_file(std::path::Path::new(path))?
    } else {
        ImportConfig::default()
    };

    let registry = PartnerRegistry::from_file(&args.registry)?;
    for issue in registry.validate() {
        warn!("Registry issue: {}", issue);
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
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
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let parser = SimplePdfParser::new(registry).with_config(config);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let result = process_single_file(&path, &parser, &args);

        match result {
            Ok(parsed) => {
                debug!("Processed {}", path.display());
                results.push(BatchResult {
                    path,
                    parsed: Some(parsed),
                    error: None,
                });
            }
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), e);
                let failed = BatchResult {
                    path,
                    parsed: None,
                    error: Some(e.to_string()),
                };
                results.push(failed);
                if args.fail_fast {
                    pb.abandon_with_message("Stopped on first failure");
                    break;
                }
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    // Summary
    let ok = results.iter().filter(|r| r.parsed.is_some()).count();
    let failed = results.len() - ok;

    println!();
    println!(
        "{} Processed {} file(s): {} ok, {} failed in {:.1}s",
        style("ℹ").blue(),
        results.len(),
        style(ok).green(),
        if failed > 0 {
            style(failed).red()
        } else {
            style(failed).green()
        },
        start.elapsed().as_secs_f64()
    );

    for result in results.iter().filter(|r| r.error.is_some()) {
        println!(
            "  {} {}: {}",
            style("✗").red(),
            result.path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("summary.csv");
        write_summary(&results, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    if failed > 0 && args.fail_fast {
        anyhow::bail!("Batch stopped on first failure");
    }

    Ok(())
}

fn process_single_file(
    path: &PathBuf,
    parser: &SimplePdfParser,
    args: &BatchArgs,
) -> anyhow::Result<ParsedInvoice> {
    let data = fs::read(path)?;
    let parsed = parser.parse(&data)?;

    if let Some(ref output_dir) = args.output_dir {
        let extension = match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        let out_path = output_dir.join(format!("{}.{}", stem, extension));
        fs::write(&out_path, format_parsed(&parsed, args.format)?)?;
    }

    Ok(parsed)
}

fn write_summary(results: &[BatchResult], path: &PathBuf) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "file",
        "status",
        "partner",
        "invoice_number",
        "date",
        "amount_total",
        "failed_fields",
        "error",
    ])?;

    for result in results {
        let file = result.path.display().to_string();
        match (&result.parsed, &result.error) {
            (Some(parsed), _) => {
                let failed: Vec<&str> =
                    parsed.failed_fields.iter().map(|f| f.label()).collect();
                wtr.write_record([
                    file.clone(),
                    "ok".to_string(),
                    parsed.partner_name.clone(),
                    parsed.invoice_number.clone().unwrap_or_default(),
                    parsed.date.map(|d| d.to_string()).unwrap_or_default(),
                    parsed
                        .amount_total
                        .map(|a| a.to_string())
                        .unwrap_or_default(),
                    failed.join("|"),
                    String::new(),
                ])?;
            }
            (None, error) => {
                wtr.write_record([
                    file.clone(),
                    "failed".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                    error.clone().unwrap_or_else(|| "unknown error".to_string()),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
