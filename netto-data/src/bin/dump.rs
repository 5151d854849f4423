use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use netto_data::{MunicipalityLoader, parameter_set_2026};

/// Validate and dump a bundled tax dataset.
///
/// With no arguments, validates the bundled 2026 parameter set and
/// municipality table and prints a summary. Pass --municipalities to load
/// a rate CSV from disk instead of the bundled one; the file should have
/// the columns:
/// - name: the official municipality name
/// - kommuneskat_pct: municipal tax as a percentage (e.g. 23.39)
/// - kirkeskat_pct: church tax as a percentage (e.g. 0.80)
#[derive(Parser, Debug)]
#[command(name = "netto-data-dump")]
#[command(version, about, long_about = None)]
struct Args {
    /// Tax year to dump
    #[arg(short, long, default_value_t = 2026)]
    year: i32,

    /// Path to a municipalities CSV file to use instead of the bundled table
    #[arg(short, long)]
    municipalities: Option<PathBuf>,

    /// Print the full dataset as JSON instead of a summary
    #[arg(short, long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.year != 2026 {
        bail!("tax year {} is not bundled (available: 2026)", args.year);
    }
    let params = parameter_set_2026();
    params
        .validate()
        .with_context(|| format!("parameter set {} failed validation", args.year))?;

    let table = match &args.municipalities {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            let records = MunicipalityLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
            println!("Parsed {} records from CSV", records.len());
            MunicipalityLoader::table(&records).context("Failed to build municipality table")?
        }
        None => MunicipalityLoader::bundled().context("Failed to load the bundled table")?,
    };

    if args.json {
        let doc = serde_json::json!({
            "tax_year": params.tax_year,
            "parameters": params,
            "municipalities": table.iter().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("Tax year {} OK", params.tax_year);
        println!(
            "  {} municipalities, kommuneskat {}..{}",
            table.len(),
            table
                .iter()
                .map(|m| m.kommuneskat)
                .min()
                .unwrap_or_default(),
            table
                .iter()
                .map(|m| m.kommuneskat)
                .max()
                .unwrap_or_default(),
        );
        println!("  {} ATP tiers, full-time {}/month", params.atp.tiers.len(), params.atp.fulltime_monthly);
    }

    Ok(())
}
