//! Registry command - inspect and validate the partner registry.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use factura_core::models::partner::{PageScope, PartnerRegistry};

/// Arguments for the registry command.
#[derive(Args)]
pub struct RegistryArgs {
    #[command(subcommand)]
    command: RegistryCommand,
}

#[derive(Subcommand)]
enum RegistryCommand {
    /// List partner records and their field configuration
    Show {
        /// Partner registry file
        #[arg(short, long)]
        registry: PathBuf,
    },

    /// Check the registry for configuration problems
    Validate {
        /// Partner registry file
        #[arg(short, long)]
        registry: PathBuf,
    },
}

pub fn run(args: RegistryArgs) -> anyhow::Result<()> {
    match args.command {
        RegistryCommand::Show { registry } => show(&registry),
        RegistryCommand::Validate { registry } => validate(&registry),
    }
}

fn show(path: &PathBuf) -> anyhow::Result<()> {
    let registry = PartnerRegistry::from_file(path)?;

    println!(
        "{} {} partner(s), {} matching candidate(s)",
        style("ℹ").blue(),
        registry.partners.len(),
        registry.candidates().count()
    );
    println!();

    for partner in &registry.partners {
        let own = registry.company_partner_id == Some(partner.id);
        println!(
            "{} {} (id {}){}",
            style("•").cyan(),
            style(&partner.name).bold(),
            partner.id,
            if own { " [own company, excluded]" } else { "" }
        );

        if let Some(vat) = &partner.vat {
            println!("    VAT: {}", vat);
        }
        if let Some(keywords) = &partner.keywords {
            println!("    Keywords: {}", keywords);
        }
        println!(
            "    Pages: {}",
            match partner.pages {
                PageScope::First => "first only",
                PageScope::All => "all",
            }
        );
        if let Some(currency) = &partner.currency {
            println!("    Currency: {}", currency);
        }
        for field in &partner.fields {
            println!(
                "    Field {:?}: rule {:?}{}{}",
                field.name,
                field.extract_rule,
                field
                    .position
                    .map(|p| format!(" position {}", p))
                    .unwrap_or_default(),
                field
                    .date_format
                    .map(|f| format!(" format {:?}", f))
                    .unwrap_or_default(),
            );
        }
    }

    Ok(())
}

fn validate(path: &PathBuf) -> anyhow::Result<()> {
    let registry = PartnerRegistry::from_file(path)?;
    let issues = registry.validate();

    if issues.is_empty() {
        println!(
            "{} Registry is valid ({} partner(s))",
            style("✓").green(),
            registry.partners.len()
        );
        return Ok(());
    }

    eprintln!("{} Registry has issues:", style("✗").red());
    for issue in &issues {
        eprintln!("  - {}", issue);
    }
    anyhow::bail!("{} registry issue(s) found", issues.len());
}
