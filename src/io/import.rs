//! CSV import of externally produced market data.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::market::MarketInterval;

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Failure to load market data.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot open market data: {0}")]
    Io(#[from] io::Error),
    #[error("malformed market data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: unrecognised timestamp \"{value}\"")]
    Timestamp { row: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct RawRow {
    timestamp: String,
    #[serde(alias = "spot_price")]
    spot_price_aud_mwh: f64,
    demand_mw: Option<f64>,
    solar_generation_mw: Option<f64>,
    wind_generation_mw: Option<f64>,
    renewable_generation_mw: Option<f64>,
    renewable_percentage: Option<f64>,
    network_losses_mw: Option<f64>,
}

/// Loads market intervals from a CSV file.
///
/// # Errors
///
/// See [`read_market_csv`].
pub fn load_market_csv(path: &Path) -> Result<Vec<MarketInterval>, ImportError> {
    let file = File::open(path)?;
    let intervals = read_market_csv(io::BufReader::new(file))?;
    info!(path = %path.display(), intervals = intervals.len(), "loaded market data");
    Ok(intervals)
}

/// Reads market intervals from CSV with a header row.
///
/// `timestamp` and `spot_price_aud_mwh` (or `spot_price`) are required.
/// Grid-condition columns are optional and may be left empty. Rows are
/// returned in file order; ordering is checked by the engine.
///
/// # Errors
///
/// Returns an `ImportError` on read failures, missing or non-numeric
/// required columns, or timestamps in neither supported layout. Row numbers
/// are 1-based and exclude the header.
pub fn read_market_csv(reader: impl Read) -> Result<Vec<MarketInterval>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut intervals = Vec::new();
    for (i, row) in rdr.deserialize::<RawRow>().enumerate() {
        let row = row?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| ImportError::Timestamp {
            row: i + 1,
            value: row.timestamp.clone(),
        })?;

        intervals.push(MarketInterval {
            timestamp,
            spot_price: row.spot_price_aud_mwh,
            demand_mw: row.demand_mw,
            solar_generation_mw: row.solar_generation_mw,
            wind_generation_mw: row.wind_generation_mw,
            renewable_generation_mw: row.renewable_generation_mw,
            renewable_percentage: row.renewable_percentage,
            network_losses_mw: row.network_losses_mw,
        });
    }

    debug!(rows = intervals.len(), "parsed market csv");
    Ok(intervals)
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}
