//! Spot market data: interval records, synthetic generation, and summaries.

pub mod interval;
/// Descriptive statistics over market data.
pub mod summary;
/// Seeded NSW-style synthetic market generator.
pub mod synthetic;

pub use interval::MarketInterval;
pub use summary::MarketSummary;
pub use synthetic::SyntheticMarket;
