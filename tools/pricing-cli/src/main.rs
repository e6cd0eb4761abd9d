//! # Pricing CLI
//!
//! Runs one batch pricing pass over a parking dataset CSV: ingest,
//! evolve, write the priced series (CSV or JSON) or print a per-lot
//! summary.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;

use pricing_engine::{ErrorPolicy, PriceEvolver, PricedObservation, PricingConfig, Strategy};

/// Batch pricing over a parking dataset
#[derive(Parser)]
#[command(name = "pricing-cli")]
#[command(about = "Compute per-lot parking prices from a dataset CSV")]
struct Cli {
    /// Path to the dataset CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Demand-scoring strategy
    #[arg(long, value_enum, default_value = "centered-incremental")]
    strategy: StrategyArg,

    /// Write the priced series here instead of printing a summary
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format for --output
    #[arg(long, value_enum, default_value = "csv")]
    format: Format,

    /// Restrict output to a single lot
    #[arg(long)]
    lot: Option<String>,

    /// Drop bad records with a warning instead of aborting
    #[arg(long)]
    skip_bad: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Incremental,
    CenteredIncremental,
    Composite,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Incremental => Strategy::Incremental,
            StrategyArg::CenteredIncremental => Strategy::CenteredIncremental,
            StrategyArg::Composite => Strategy::Composite,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

/// One output row, flat for CSV
#[derive(Serialize)]
struct OutputRow<'a> {
    lot_id: &'a str,
    timestamp: String,
    occupancy: u32,
    capacity: u32,
    queue_length: u32,
    price: f64,
}

impl<'a> From<&'a PricedObservation> for OutputRow<'a> {
    fn from(p: &'a PricedObservation) -> Self {
        Self {
            lot_id: &p.observation.lot_id,
            timestamp: p.observation.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            occupancy: p.observation.occupancy,
            capacity: p.observation.capacity,
            queue_length: p.observation.queue_length,
            price: p.price,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = PricingConfig::from_env()?;
    config.strategy = cli.strategy.into();
    if cli.skip_bad {
        config.error_policy = ErrorPolicy::Skip;
    }
    info!("Loaded configuration: {:?}", config);

    let records = lot_feed::load_csv(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;

    let mut evolver = PriceEvolver::new(config)?;
    let mut priced = evolver.evolve(&records)?;

    if let Some(lot) = &cli.lot {
        priced.retain(|p| &p.observation.lot_id == lot);
        if priced.is_empty() {
            anyhow::bail!("no records for lot {lot}");
        }
    }

    match &cli.output {
        Some(path) => {
            match cli.format {
                Format::Csv => write_csv(path, &priced)?,
                Format::Json => write_json(path, &priced)?,
            }
            info!(rows = priced.len(), path = %path.display(), "wrote priced series");
        }
        None => print_summary(&priced),
    }

    Ok(())
}

fn write_csv(path: &PathBuf, priced: &[PricedObservation]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for p in priced {
        writer.serialize(OutputRow::from(p))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &PathBuf, priced: &[PricedObservation]) -> Result<()> {
    let rows: Vec<OutputRow> = priced.iter().map(OutputRow::from).collect();
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

fn print_summary(priced: &[PricedObservation]) {
    struct LotSummary {
        count: usize,
        min: f64,
        max: f64,
        last: f64,
    }

    let mut lots: BTreeMap<&str, LotSummary> = BTreeMap::new();
    for p in priced {
        let entry = lots.entry(&p.observation.lot_id).or_insert(LotSummary {
            count: 0,
            min: p.price,
            max: p.price,
            last: p.price,
        });
        entry.count += 1;
        entry.min = entry.min.min(p.price);
        entry.max = entry.max.max(p.price);
        entry.last = p.price;
    }

    println!("{:<16} {:>8} {:>10} {:>10} {:>10}", "lot", "records", "min", "max", "last");
    for (lot, s) in &lots {
        println!(
            "{:<16} {:>8} {:>10.2} {:>10.2} {:>10.2}",
            lot, s.count, s.min, s.max, s.last
        );
    }
    println!("{} lots, {} priced records", lots.len(), priced.len());
}
