//! Error types for the simulation core.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised by battery construction and the simulation driver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A battery parameter is non-positive or not finite.
    #[error("invalid parameter `{parameter}`: {value} (must be a positive, finite number)")]
    InvalidParameter {
        parameter: &'static str,
        value: f64,
    },

    /// The interval sequence is not strictly increasing in time.
    #[error("interval {index} at {current} does not follow previous interval at {previous}")]
    OutOfOrderInput {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },
}

pub type Result<T, E = SimError> = std::result::Result<T, E>;
