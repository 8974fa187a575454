//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

/// Parsed CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "bess-sim")]
#[command(version, about = "Battery energy storage simulator on a wholesale spot market")]
#[command(
    long_about = "Simulates a grid-scale battery charging and dispatching on a fixed daily \
    schedule against spot market prices.\n\
    \nMarket data is synthetic unless --market-data points to a CSV file.\n\
    If no --scenario or --preset is given, the baseline preset is used.\n\
    \nExamples:\n  \
    bess-sim\n  \
    bess-sim --preset legacy_divisor --days 7\n  \
    bess-sim --scenario scenarios/baseline.toml --telemetry-out results.csv\n  \
    bess-sim --market-data prices.csv --print-records"
)]
pub struct Args {
    /// Load scenario from a TOML or JSON file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, legacy_divisor, long_duration)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of synthetic days
    #[arg(long)]
    pub days: Option<u32>,

    /// Override the first synthetic day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Read market data from CSV instead of generating it
    #[arg(long, value_name = "PATH")]
    pub market_data: Option<PathBuf>,

    /// Export market data and results to CSV
    #[arg(long, value_name = "PATH")]
    pub telemetry_out: Option<PathBuf>,

    /// Print one line per simulated interval
    #[arg(long, default_value_t = false)]
    pub print_records: bool,
}
