//! Process command - extract fields from a single invoice PDF.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use factura_core::models::config::ImportConfig;
use factura_core::models::parsed::ParsedInvoice;
use factura_core::models::partner::PartnerRegistry;
use factura_core::{ImportOptions, SimplePdfParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Partner registry file
    #[arg(short, long)]
    registry: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report how the vendor was matched
    #[arg(long)]
    test_mode: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let config = if let Some(path) = config_path {
        ImportConfig::from_file(std::path::Path::new(path))?
    } else {
        ImportConfig::default()
    };

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let registry = PartnerRegistry::from_file(&args.registry)?;
    for issue in registry.validate() {
        warn!("Registry issue: {}", issue);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(&args.input)?;

    pb.set_message("Extracting fields...");
    pb.set_position(40);

    let parser = SimplePdfParser::new(registry).with_config(config);
    let parsed = parser.parse_with_options(
        &data,
        ImportOptions {
            test_mode: args.test_mode,
        },
    )?;

    pb.set_position(100);
    pb.finish_with_message("Done");

    let output = format_parsed(&parsed, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !parsed.failed_fields.is_empty() {
        eprintln!(
            "{} {} field(s) could not be extracted",
            style("!").yellow(),
            parsed.failed_fields.len()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_parsed(parsed: &ParsedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(parsed)?),
        OutputFormat::Csv => format_csv(parsed),
        OutputFormat::Text => format_text(parsed),
    }
}

fn format_csv(parsed: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "partner_id",
        "partner_name",
        "currency",
        "invoice_number",
        "description",
        "date",
        "date_due",
        "date_start",
        "date_end",
        "amount_untaxed",
        "amount_tax",
        "amount_total",
        "failed_fields",
    ])?;

    let failed: Vec<String> = parsed
        .failed_fields
        .iter()
        .map(|f| f.label().to_string())
        .collect();

    wtr.write_record([
        &parsed.partner_id.to_string(),
        &parsed.partner_name,
        &parsed.currency.clone().unwrap_or_default(),
        &parsed.invoice_number.clone().unwrap_or_default(),
        &parsed.description.clone().unwrap_or_default(),
        &parsed.date.map(|d| d.to_string()).unwrap_or_default(),
        &parsed.date_due.map(|d| d.to_string()).unwrap_or_default(),
        &parsed.date_start.map(|d| d.to_string()).unwrap_or_default(),
        &parsed.date_end.map(|d| d.to_string()).unwrap_or_default(),
        &parsed
            .amount_untaxed
            .map(|a| a.to_string())
            .unwrap_or_default(),
        &parsed
            .amount_tax
            .map(|a| a.to_string())
            .unwrap_or_default(),
        &parsed
            .amount_total
            .map(|a| a.to_string())
            .unwrap_or_default(),
        &failed.join("|"),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(parsed: &ParsedInvoice) -> anyhow::Result<String> {
    let mut output = String::new();

    output.push_str(&format!(
        "Vendor: {} (id {})\n",
        parsed.partner_name, parsed.partner_id
    ));
    if let Some(currency) = &parsed.currency {
        output.push_str(&format!("Currency: {}\n", currency));
    }
    if let Some(number) = &parsed.invoice_number {
        output.push_str(&format!("Invoice number: {}\n", number));
    }
    if let Some(description) = &parsed.description {
        output.push_str(&format!("Description: {}\n", description));
    }

    if let Some(date) = parsed.date {
        output.push_str(&format!("Date: {}\n", date));
    }
    if let Some(date_due) = parsed.date_due {
        output.push_str(&format!("Due date: {}\n", date_due));
    }
    if let Some(date_start) = parsed.date_start {
        output.push_str(&format!("Period start: {}\n", date_start));
    }
    if let Some(date_end) = parsed.date_end {
        output.push_str(&format!("Period end: {}\n", date_end));
    }

    if let Some(amount) = parsed.amount_untaxed {
        output.push_str(&format!("Untaxed: {}\n", amount));
    }
    if let Some(amount) = parsed.amount_tax {
        output.push_str(&format!("Tax: {}\n", amount));
    }
    if let Some(amount) = parsed.amount_total {
        output.push_str(&format!("Total: {}\n", amount));
    }

    if !parsed.failed_fields.is_empty() {
        let labels: Vec<&str> = parsed.failed_fields.iter().map(|f| f.label()).collect();
        output.push_str(&format!("Failed fields: {}\n", labels.join(", ")));
    }

    Ok(output)
}
