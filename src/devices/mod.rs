//! Storage devices participating in the spot market.

/// Grid-scale battery energy storage model.
pub mod battery;

pub use battery::Battery;
