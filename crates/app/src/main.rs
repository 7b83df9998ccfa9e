use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use summa_core::{export, Ledger, Origin};
use summa_import::{ingest, Ruleset};

#[derive(Debug, Parser)]
#[command(
    name = "summa",
    about = "Consolidate bank and card statement exports into one categorized ledger"
)]
struct Cli {
    /// Statement export files (delimited text).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Categorization rule table (TOML). Defaults to the built-in rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Write the merged ledger here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Emit the ledger as JSON instead of CSV.
    #[arg(long)]
    json: bool,

    /// Print a ranked per-category breakdown to stderr.
    #[arg(long)]
    report: bool,

    /// Emit a bounded (description, amount) sample as JSON for the external
    /// summarization service, instead of the ledger itself.
    #[arg(long, value_name = "N")]
    sample: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading rules file {}", path.display()))?;
            Ruleset::from_toml(&text)
                .with_context(|| format!("loading rules from {}", path.display()))?
        }
        None => Ruleset::default(),
    };

    let mut ledger = Ledger::new();
    for path in &cli.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading statement {}", path.display()))?;
        let origin = origin_for(path);
        let account = account_label(path);
        let batch = ingest(&text, origin, &account, &rules);
        tracing::info!(file = %path.display(), ?origin, rows = batch.len(), "merging batch");
        ledger = ledger.merge(batch);
    }

    if let Some(limit) = cli.sample {
        let payload = serde_json::to_string_pretty(&ledger.summary_sample(limit))?;
        println!("{payload}");
        return Ok(());
    }

    if cli.report {
        for (category, total) in ledger.category_totals() {
            eprintln!("{category:<16} {}", total.to_display_grouped());
        }
    }

    let rendered = if cli.json {
        serde_json::to_string_pretty(&ledger)?
    } else {
        export::to_csv(&ledger)
    };
    match &cli.out {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("writing ledger to {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Filename heuristics own origin resolution; the core only ever sees the
/// resolved tag.
fn origin_for(path: &Path) -> Origin {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if name.contains("rbc") {
        Origin::Rbc
    } else if name.contains("tangerine") {
        Origin::Tangerine
    } else if name.contains("amex") {
        Origin::Amex
    } else if name.contains("paypal") {
        Origin::PayPal
    } else {
        Origin::Other
    }
}

fn account_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}
