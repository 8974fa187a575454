//! Battery energy storage simulator trading on a wholesale spot market.

pub mod config;
pub mod devices;
pub mod error;
pub mod io;
/// Spot market data, synthetic generation, and summaries.
pub mod market;
pub mod reporting;
/// Simulation engine, dispatch policy, windows, and KPI modules.
pub mod sim;
