//! CSV export of market data merged with simulation records.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::market::MarketInterval;
use crate::sim::types::SimulationRecord;

/// Market columns, written before the battery columns.
const MARKET_HEADER: [&str; 8] = [
    "timestamp",
    "spot_price_aud_mwh",
    "demand_mw",
    "solar_generation_mw",
    "wind_generation_mw",
    "renewable_generation_mw",
    "renewable_percentage",
    "network_losses_mw",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Exports market data and simulation records to a CSV file at the given path.
///
/// # Arguments
///
/// * `intervals` - Market data the simulation ran on
/// * `records` - One record per interval, in the same order
/// * `battery_name` - Prefix for the battery columns
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails, or if the two
/// slices differ in length.
pub fn export_csv(
    intervals: &[MarketInterval],
    records: &[SimulationRecord],
    battery_name: &str,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(intervals, records, battery_name, buf)
}

/// Writes market data and simulation records as CSV to any writer.
///
/// The header is the market columns followed by `{name}_dispatch`,
/// `{name}_cost` and `{name}_capacity`. Absent grid-condition values are
/// written as empty cells. Output is deterministic for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` of kind `InvalidInput` if `intervals` and
/// `records` differ in length, or any error from the writer.
pub fn write_csv(
    intervals: &[MarketInterval],
    records: &[SimulationRecord],
    battery_name: &str,
    writer: impl Write,
) -> io::Result<()> {
    if intervals.len() != records.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} market intervals but {} simulation records",
                intervals.len(),
                records.len()
            ),
        ));
    }

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header: Vec<String> = MARKET_HEADER.iter().map(|h| (*h).to_string()).collect();
    header.extend(
        ["dispatch", "cost", "capacity"]
            .iter()
            .map(|suffix| format!("{battery_name}_{suffix}")),
    );
    wtr.write_record(&header)?;

    for (m, r) in intervals.iter().zip(records) {
        wtr.write_record(&[
            m.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            m.spot_price.to_string(),
            optional(m.demand_mw),
            optional(m.solar_generation_mw),
            optional(m.wind_generation_mw),
            optional(m.renewable_generation_mw),
            optional(m.renewable_percentage),
            optional(m.network_losses_mw),
            format!("{:.6}", r.dispatch_mw),
            format!("{:.6}", r.cost),
            format!("{:.6}", r.capacity_after),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
